//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::{LoadError, LocationError};

#[test]
fn test_load_error_messages() {
    let err = LoadError::Fetch {
        location: "./imagery/lidar.tiff".to_string(),
        cause: "No such file or directory (os error 2)".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Error loading ./imagery/lidar.tiff: No such file or directory (os error 2)"
    );
    assert_eq!(err.cause(), "No such file or directory (os error 2)");

    let err = LoadError::Parse {
        location: "markers.geojson".to_string(),
        cause: "missing field `features`".to_string(),
    };
    assert_eq!(err.cause(), "missing field `features`");

    let err = LoadError::Unsupported("Raster decoding not supported".to_string());
    assert_eq!(err.cause(), err.to_string());
}

#[test]
fn test_location_error() {
    let err = LocationError::new(LocationError::PERMISSION_DENIED, "User denied Geolocation");
    assert_eq!(err.to_string(), "User denied Geolocation (code 1)");
}
