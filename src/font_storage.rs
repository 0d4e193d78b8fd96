use std::{collections::HashMap, path::Path, path::PathBuf, sync::Arc};

use crate::error::{BaconError, Result};

/// Font database used to resolve faces for [`crate::font::Font`].
///
/// Faces are registered with `fontdb` and parsed by `fontdue` only when a
/// font is first created from them. Parsed faces are shared between every
/// font size built from the same face.
pub struct FontStorage {
    /// Every face known to fontdb.
    font_db: fontdb::Database,
    /// Faces already parsed by fontdue.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
    /// Faces registered per file, so a path is only read once.
    font_files: HashMap<PathBuf, Vec<fontdb::ID>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            font_files: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Registering faces.
impl FontStorage {
    /// Registers every face found in `data`.
    ///
    /// Returns [`BaconError::UnsupportedFormat`] when the data holds no
    /// recognizable face.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) -> Result<Vec<fontdb::ID>> {
        let data: Vec<u8> = data.into();
        let source = fontdb::Source::Binary(Arc::new(data));
        let ids: Vec<fontdb::ID> = self.font_db.load_font_source(source).to_vec();
        if ids.is_empty() {
            return Err(BaconError::UnsupportedFormat);
        }
        Ok(ids)
    }

    /// Registers the faces of a font file.
    ///
    /// Loading the same path twice returns the faces registered the first time.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<fontdb::ID>> {
        let path = path.as_ref();
        if let Some(ids) = self.font_files.get(path) {
            return Ok(ids.clone());
        }

        let data = std::fs::read(path)?;
        let ids = self.load_font_binary(data).inspect_err(|_| {
            log::warn!("no font faces found in {}", path.display());
        })?;
        log::debug!("loaded {} face(s) from {}", ids.len(), path.display());

        self.font_files.insert(path.to_path_buf(), ids.clone());
        Ok(ids)
    }

    /// Registers all fonts in a directory, recursively.
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Registers the fonts installed on the system.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Forgets a face. Fonts already created from it stay usable.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded_font.remove(&id);
        self.font_files.retain(|_, ids| {
            ids.retain(|face| *face != id);
            !ids.is_empty()
        });
    }

    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of registered faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `Font`
impl FontStorage {
    /// Finds the best face for `query` and returns it parsed.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Returns the parsed face for `id`, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    /// Returns face info for an ID.
    pub fn face(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }

    /// Returns an iterator over all registered faces.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }
}
