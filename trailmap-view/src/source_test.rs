//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::coordinator_test::{
    lidar_bounds, marker_options, raster_options, MemoryFetcher, StubDecoder, MARKERS_JSON,
};
use crate::source::{load_markers, load_raster, FileFetcher, Fetcher};
use futures::executor::block_on;
use std::fs;
use std::path::Path;
use trailmap_core::{Bounds, LoadError};

#[test]
fn test_file_fetcher_resolve() {
    let fetcher = FileFetcher::new("/srv/trailmap");
    assert_eq!(
        fetcher.resolve("./imagery/lidar.tiff"),
        Path::new("/srv/trailmap/./imagery/lidar.tiff")
    );
    assert_eq!(
        fetcher.resolve("/data/lidar.tiff"),
        Path::new("/data/lidar.tiff")
    );
}

#[tokio::test]
async fn test_file_fetcher() {
    let basedir = std::env::temp_dir().join(format!("trailmap_fetch_{}", std::process::id()));
    fs::create_dir_all(basedir.join("markers")).unwrap();
    fs::write(basedir.join("markers/markers.geojson"), MARKERS_JSON).unwrap();

    let fetcher = FileFetcher::new(&basedir);
    let data = fetcher.fetch("markers/markers.geojson").await.unwrap();
    assert_eq!(data, MARKERS_JSON.as_bytes());

    let markers = load_markers(&fetcher, &marker_options()).await.unwrap();
    assert_eq!(markers.len(), 2);

    match fetcher.fetch("missing.geojson").await {
        Err(LoadError::Fetch { location, .. }) => assert_eq!(location, "missing.geojson"),
        other => panic!("unexpected result {:?}", other),
    }
    fs::remove_dir_all(&basedir).unwrap();
}

#[test]
fn test_load_markers() {
    let fetcher = MemoryFetcher::default()
        .with("./markers/markers.geojson", MARKERS_JSON.as_bytes())
        .with("./markers/broken.geojson", b"{\"type\": \"FeatureCollection\"");
    let markers = block_on(load_markers(&fetcher, &marker_options())).unwrap();
    assert_eq!(markers.len(), 2);

    let mut options = marker_options();
    options.location = "./markers/broken.geojson".to_string();
    match block_on(load_markers(&fetcher, &options)) {
        Err(LoadError::Parse { location, .. }) => {
            assert_eq!(location, "./markers/broken.geojson")
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_load_raster() {
    let fetcher = MemoryFetcher::default().with("./imagery/lidar.tiff", b"II*\0lidar");
    let decoder = StubDecoder {
        bounds: lidar_bounds(),
    };
    let raster = block_on(load_raster(&fetcher, &decoder, &raster_options())).unwrap();
    assert_eq!(raster.bounds, lidar_bounds());
    assert_eq!((raster.width, raster.height), (400, 240));
    assert_eq!(raster.payload.len(), 9);
}

#[test]
fn test_load_raster_errors() {
    let decoder = StubDecoder {
        bounds: lidar_bounds(),
    };
    let fetcher = MemoryFetcher::default();
    assert_eq!(
        block_on(load_raster(&fetcher, &decoder, &raster_options()))
            .unwrap_err()
            .to_string(),
        "Error loading ./imagery/lidar.tiff: 404 Not Found"
    );

    let fetcher = MemoryFetcher::default().with("./imagery/lidar.tiff", b"GIF89a");
    match block_on(load_raster(&fetcher, &decoder, &raster_options())) {
        Err(LoadError::Decode { cause, .. }) => assert_eq!(cause, "not a TIFF file"),
        other => panic!("unexpected result {:?}", other),
    }

    // raster without usable georeference
    let empty = StubDecoder {
        bounds: Bounds {
            minx: 10.5,
            miny: 47.0,
            maxx: 10.0,
            maxy: std::f64::NAN,
        },
    };
    let fetcher = MemoryFetcher::default().with("./imagery/lidar.tiff", b"II*\0lidar");
    match block_on(load_raster(&fetcher, &empty, &raster_options())) {
        Err(LoadError::Decode { cause, .. }) => assert!(cause.starts_with("invalid raster extent")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[cfg(not(feature = "with-gdal"))]
#[test]
fn test_unsupported_decoder() {
    let fetcher = MemoryFetcher::default().with("./imagery/lidar.tiff", b"II*\0lidar");
    let decoder = crate::source::default_decoder();
    match block_on(load_raster(&fetcher, decoder.as_ref(), &raster_options())) {
        Err(LoadError::Unsupported(msg)) => assert_eq!(
            msg,
            "Raster decoding of ./imagery/lidar.tiff not supported in this build"
        ),
        other => panic!("unexpected result {:?}", other),
    }
}
