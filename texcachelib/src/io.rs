use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use crate::error::SimError;

/// Opens a text input for line by line reading
///
/// Duplicate maps hold one line per minimal cell, so they get large for big textures
pub fn get_reader(path: &Path) -> Result<impl BufRead, SimError> {
    let file = File::open(path).map_err(|e| SimError::resource(path, e.to_string()))?;
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        const BUFFER_SIZE: usize = 16 * 4096;
        Ok(BufReader::with_capacity(BUFFER_SIZE, file))
    }
    // Memory map the file on unix systems, the map is only ever read front to back
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        unsafe {
            let m = Mmap::map(&file).map_err(|e| SimError::resource(path, format!("Couldn't memory map the file: {e}")))?;
            m.advise(Advice::Sequential).map_err(|e| SimError::resource(path, format!("Failed to provide access advice to the OS, {e}")))?;
            Ok(Cursor::new(m))
        }
    }
}
