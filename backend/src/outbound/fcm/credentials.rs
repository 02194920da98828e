//! Bearer credential for the FCM HTTP v1 API.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use zeroize::Zeroizing;

/// Errors raised while loading the access token.
#[derive(Debug, thiserror::Error)]
pub enum FcmCredentialError {
    /// Reading the token file failed.
    #[error("failed to read FCM access token at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The token file is empty.
    #[error("FCM access token at {path} is empty")]
    Empty { path: PathBuf },
}

/// OAuth2 access token sent as `Authorization: Bearer`.
///
/// The value is wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct FcmAccessToken(Zeroizing<String>);

impl FcmAccessToken {
    /// Wrap a token value. Surrounding whitespace is removed.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(trimmed.to_owned())))
        }
    }

    /// Read a token from a file through `cap_std`.
    ///
    /// # Errors
    ///
    /// Returns [`FcmCredentialError::Read`] when the file cannot be read and
    /// [`FcmCredentialError::Empty`] when it holds only whitespace.
    pub fn read_from_file(path: &Path) -> Result<Self, FcmCredentialError> {
        let contents = Zeroizing::new(read_secret(path).map_err(|source| {
            FcmCredentialError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?);
        Self::new(&contents).ok_or_else(|| FcmCredentialError::Empty {
            path: path.to_path_buf(),
        })
    }

    pub(super) fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for FcmAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FcmAccessToken(<redacted>)")
    }
}

fn read_secret(path: &Path) -> io::Result<String> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "token path must name a file")
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read_to_string(Path::new(file_name))
}
