use std::io::BufRead;
use std::path::Path;
use log::debug;
use crate::error::SimError;
use crate::io::get_reader;

/// Maps every minimal cell to the earlier cell whose content it duplicates
///
/// Produced offline, the library never infers duplicates itself. A cell which is not a duplicate
/// maps to its own index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DuplicateMap {
    canonical: Vec<usize>,
}

impl DuplicateMap {

    /// Reads a duplicate map file: a header line, then one canonical index per line
    pub fn open(path: &Path) -> Result<Self, SimError> {
        let map = Self::from_reader(get_reader(path)?)
            .map_err(|message| SimError::resource(path, message))?;
        debug!("Loaded duplicate map {} with {} cells", path.display(), map.len());
        Ok(map)
    }

    /// Parses the duplicate map format from any reader
    ///
    /// Every value must be an index no greater than its own line's index; blank lines are skipped
    ///
    /// returns: Result<DuplicateMap, String>, the error describes the offending line
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut canonical = Vec::new();
        // First line is the header
        for (line_number, line) in reader.lines().enumerate().skip(1) {
            let line = line.map_err(|e| format!("Couldn't read line {}: {e}", line_number + 1))?;
            let value = line.trim();
            if value.is_empty() {
                continue;
            }
            let index = canonical.len();
            let target: usize = value
                .parse()
                .map_err(|e| format!("Line {} ({value}) isn't a cell index: {e}", line_number + 1))?;
            if target > index {
                return Err(format!(
                    "Line {}: cell {index} can't duplicate the later cell {target}",
                    line_number + 1
                ));
            }
            canonical.push(target);
        }
        Ok(Self { canonical })
    }

    /// A map where no cell duplicates another
    pub fn identity(len: usize) -> Self {
        Self {
            canonical: (0..len).collect(),
        }
    }

    pub fn from_indices(canonical: Vec<usize>) -> Self {
        Self { canonical }
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// The cell which `index` duplicates, or `index` itself
    ///
    /// Panics if the map has no entry for `index`
    pub fn canonical(&self, index: usize) -> usize {
        assert!(
            index < self.canonical.len(),
            "duplicate map has no entry for cell {index} ({} entries)",
            self.canonical.len()
        );
        self.canonical[index]
    }

    /// Checks the map covers at least `cells` cells, so construction never looks up a missing entry
    pub(crate) fn ensure_covers(&self, cells: usize) -> Result<(), SimError> {
        if self.canonical.len() < cells {
            return Err(SimError::Configuration(format!(
                "duplicate map covers {} cells but the texture has {cells}",
                self.canonical.len()
            )));
        }
        Ok(())
    }
}
