//! Parser for the single-dash parameters accepted by the `yaweather` binary.
//!
//! Tokens are scanned left to right and the first error stops the scan.
//! Value checks are syntactic only: the API file is checked for existence,
//! never read, and coordinates are not range-checked here.

use std::{fmt, path::PathBuf};

use crate::{error::ParamError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Api,
    Help,
    LatLon,
    Limit,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Api => "-api",
            Flag::Help => "-help",
            Flag::LatLon => "-latlon",
            Flag::Limit => "-limit",
        }
    }

    pub const fn all() -> &'static [Flag] {
        &[Flag::Api, Flag::Help, Flag::LatLon, Flag::Limit]
    }

    /// Error reported when the flag's value is malformed or absent.
    fn value_error(&self) -> ParamError {
        match self {
            Flag::Api => ParamError::BadApiFile,
            Flag::LatLon => ParamError::BadLatLon,
            Flag::Limit => ParamError::BadLimit,
            Flag::Help => ParamError::WrongParameter,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Flag {
    type Error = ParamError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Flag::all()
            .iter()
            .copied()
            .find(|flag| flag.as_str() == value)
            .ok_or(ParamError::WrongParameter)
    }
}

/// Parameters collected from the command line.
///
/// `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pub api_file: Option<PathBuf>,
    pub limit: Option<i32>,
    pub latlon: Option<Coordinates>,
    pub help: bool,
}

impl Params {
    pub fn parse<I, S>(tokens: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (params, pending) = tokens.into_iter().try_fold(
            (Params::default(), None::<Flag>),
            |(mut params, pending), token| -> Result<_, ParamError> {
                let token = token.as_ref();
                match pending {
                    Some(flag) => {
                        params.apply(flag, token)?;
                        Ok((params, None))
                    }
                    None => match Flag::try_from(token)? {
                        Flag::Help => {
                            params.help = true;
                            Ok((params, None))
                        }
                        flag => Ok((params, Some(flag))),
                    },
                }
            },
        )?;

        // A trailing flag with no value is reported as a bad value rather than
        // being left unset for the caller to flag as missing.
        match pending {
            Some(flag) => Err(flag.value_error()),
            None => Ok(params),
        }
    }

    fn apply(&mut self, flag: Flag, value: &str) -> Result<(), ParamError> {
        match flag {
            Flag::Api => self.api_file = Some(parse_api_file(value)?),
            Flag::Limit => self.limit = Some(value.parse().map_err(|_| ParamError::BadLimit)?),
            Flag::LatLon => self.latlon = Some(parse_latlon(value)?),
            Flag::Help => return Err(ParamError::WrongParameter),
        }
        Ok(())
    }
}

fn parse_api_file(value: &str) -> Result<PathBuf, ParamError> {
    let path = PathBuf::from(value);
    if path.is_file() { Ok(path) } else { Err(ParamError::BadApiFile) }
}

fn parse_latlon(value: &str) -> Result<Coordinates, ParamError> {
    let (lat, lon) = value.split_once(':').ok_or(ParamError::BadLatLon)?;
    let lat = lat.trim().parse::<f64>().map_err(|_| ParamError::BadLatLon)?;
    let lon = lon.trim().parse::<f64>().map_err(|_| ParamError::BadLatLon)?;
    Ok(Coordinates::new(lat, lon))
}
