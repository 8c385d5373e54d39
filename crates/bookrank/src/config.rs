//! Credentials used to sign lookups and the files they are read from.

use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};

use crate::{Error, ErrorKind};

const ID_FILE_NAME: &str = "amazon-id";
const KEY_FILE_NAME: &str = "amazon-key";

/// The files holding the access id and the secret key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialFiles {
    /// File containing the access id.
    pub id_file: PathBuf,
    /// File containing the secret key.
    pub key_file: PathBuf,
}

impl CredentialFiles {
    /// Creates a new [`CredentialFiles`] from explicit paths.
    pub fn new<I, K>(id_file: I, key_file: K) -> Self
    where
        I: Into<PathBuf>,
        K: Into<PathBuf>,
    {
        Self {
            id_file: id_file.into(),
            key_file: key_file.into(),
        }
    }

    /// The conventional credential files in the `home` directory.
    ///
    /// These are hidden dot files (`.amazon-id`, `.amazon-key`), or `.txt` files on Windows.
    #[must_use]
    pub fn default_in(home: &Path) -> Self {
        Self::new(home.join(file_name(ID_FILE_NAME)), home.join(file_name(KEY_FILE_NAME)))
    }

    /// The conventional credential files in the home directory of the current user.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Config`] error is returned when neither `HOME` nor `USERPROFILE` is set.
    pub fn from_home() -> Result<Self, Error> {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .filter(|home| !home.is_empty())
            .map(|home| Self::default_in(Path::new(&home)))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Config,
                    "Cannot find a home directory for the default credential files",
                )
            })
    }
}

fn file_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.txt")
    } else {
        format!(".{name}")
    }
}

/// The access id and secret key used to sign requests.
///
/// Either may be empty - whether that is acceptable is left to the service.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    access_id: String,
    secret_key: String,
}

impl Credentials {
    /// Creates new [`Credentials`].
    pub fn new<I, K>(access_id: I, secret_key: K) -> Self
    where
        I: Into<String>,
        K: Into<String>,
    {
        Self {
            access_id: access_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Reads [`Credentials`] from `files`.
    ///
    /// Every line of a file is trimmed and the lines are joined. A file that does not exist
    /// gives an empty value.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error is returned when a file exists but cannot be read.
    pub fn load(files: &CredentialFiles) -> Result<Self, Error> {
        Ok(Self {
            access_id: read_credential(&files.id_file)?,
            secret_key: read_credential(&files.key_file)?,
        })
    }

    /// The access id sent with each request.
    #[must_use]
    pub fn access_id(&self) -> &str {
        &self.access_id
    }

    /// The secret key requests are signed with.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Whether both the access id and the secret key are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_id.is_empty() && !self.secret_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

fn read_credential(path: &Path) -> Result<String, Error> {
    trace!("Reading credential file '{}'", path.display());
    match fs::read_to_string(path) {
        Ok(content) => Ok(content.lines().map(str::trim).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No credential file at '{}'", path.display());
            Ok(String::new())
        }
        Err(e) => Err(Error::with_source(
            ErrorKind::IO,
            format!("Cannot read credential file '{}'", path.display()),
            e,
        )),
    }
}
