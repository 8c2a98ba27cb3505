use parley_core::ParleyResult;
use std::path::Path;
use tempfile::NamedTempFile;

/// A transient audio payload spilled to disk.
///
/// Some collaborators (local whisper binaries, codec tools) only accept
/// a file path. `AudioSpill` scopes that file to the request: the file
/// is created in the system temp directory and removed when the value
/// drops, whether the request succeeded or not.
pub struct AudioSpill {
    file: NamedTempFile,
}

impl AudioSpill {
    /// Writes the payload to a fresh temp file.
    pub fn write(audio: &[u8]) -> ParleyResult<Self> {
        let file = NamedTempFile::with_suffix(".wav")?;
        std::fs::write(file.path(), audio)?;
        Ok(Self { file })
    }

    /// Path of the spilled file, valid until this value drops.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn spill_writes_payload_and_cleans_up_on_drop() {
        let spill = AudioSpill::write(b"RIFF fake wav").unwrap();
        let path = spill.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF fake wav");

        drop(spill);
        assert!(!path.exists());
    }

    #[test]
    fn spill_cleans_up_when_caller_unwinds() {
        let path = {
            let spill = AudioSpill::write(b"bytes").unwrap();
            spill.path().to_path_buf()
            // dropped here, as it would be during error propagation
        };
        assert!(!path.exists());
    }
}
