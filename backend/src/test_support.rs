//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pickup_backend::test_support::cap_fs::write_file;
    ///
    /// let path = std::env::temp_dir().join("cap-fs-write-example.txt");
    /// write_file(&path, b"token\n")?;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path must include a file name")
            })?
            .to_os_string();
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }
}

pub mod clock;
pub mod order_history;
pub mod push;
pub mod users;

pub use clock::MutableClock;
pub use order_history::InMemoryOrderHistory;
pub use push::{RecordingPushMessenger, SentPush};
pub use users::{InMemoryUserDirectory, driver, user};
