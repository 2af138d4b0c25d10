//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use thiserror::Error;

/// Failure of an overlay fetch-and-decode pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Error loading {location}: {cause}")]
    Fetch { location: String, cause: String },
    #[error("Error decoding {location}: {cause}")]
    Decode { location: String, cause: String },
    #[error("Error parsing {location}: {cause}")]
    Parse { location: String, cause: String },
    #[error("{0}")]
    Unsupported(String),
}

impl LoadError {
    /// Failure description without the location
    pub fn cause(&self) -> &str {
        match self {
            LoadError::Fetch { cause, .. }
            | LoadError::Decode { cause, .. }
            | LoadError::Parse { cause, .. } => cause,
            LoadError::Unsupported(msg) => msg,
        }
    }
}

/// Geolocation failure reported by the host platform
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (code {code})")]
pub struct LocationError {
    pub code: u16,
    pub message: String,
}

impl LocationError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: &str) -> LocationError {
        LocationError {
            code,
            message: message.to_string(),
        }
    }
}
