use std::{path::Path, str::FromStr};

use serde::de::DeserializeOwned;
use tokio::fs::{metadata, read_to_string};

use crate::result::{SiteError, SiteResult};

/**
    Loads the given type from the file at the given path.

    Will return an error if the file does not exist or could not be parsed.
*/
pub(crate) async fn load_from_file<P, T, E>(path: P) -> SiteResult<T>
where
    P: AsRef<Path>,
    T: FromStr<Err = E>,
    E: Into<SiteError>,
{
    let path = path.as_ref();
    match read_to_string(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SiteError::FileNotFound(path.into()))
        }
        Err(e) => Err(e.into()),
        Ok(s) => match s.parse() {
            Ok(t) => Ok(t),
            Err(e) => Err(e.into()),
        },
    }
}

/**
    Loads and deserializes a JSON document from the file at the given path.

    Will return an error if the file does not exist or could not be parsed.
*/
pub(crate) async fn load_json_file<P, T>(path: P) -> SiteResult<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let path = path.as_ref();
    match read_to_string(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SiteError::FileNotFound(path.into()))
        }
        Err(e) => Err(e.into()),
        Ok(s) => Ok(serde_json::from_str(&s)?),
    }
}

/**
    Checks if the given path exists.

    Note that this may return `false` if the caller
    does not have permissions to access the given path.
*/
pub(crate) async fn path_exists(path: impl AsRef<Path>) -> bool {
    metadata(path).await.is_ok()
}
