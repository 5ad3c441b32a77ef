//! Map persistence.
//!
//! Saves maps as versioned JSON files named by a UTC timestamp so the
//! directory listing sorts chronologically. Load failures come back as
//! `io::Error` values the menu surfaces as retry-eligible messages; a save
//! failure never touches the in-memory map.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::worldmap::WorldMap;

pub const SAVE_EXTENSION: &str = "realm";

const SAVE_VERSION: u32 = 1;

/// Save file wrapper. The version field lets newer formats be rejected
/// cleanly instead of misparsed.
#[derive(serde::Serialize, serde::Deserialize)]
struct MapSaveFile {
    version: u32,
    map: WorldMap,
}

/// Filename for a save taken at the given instant:
/// `map_<YYYYMMDD_HHMMSS>.realm`. Lexical order equals chronological
/// order. Two saves within the same second collide and overwrite; accepted
/// as-is.
pub fn save_filename(at: DateTime<Utc>) -> String {
    format!("map_{}.{}", at.format("%Y%m%d_%H%M%S"), SAVE_EXTENSION)
}

/// Write the map into `directory` under a timestamped name, creating the
/// directory if needed. Returns the path written.
pub fn save_map(map: &WorldMap, directory: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(directory)?;
    let path = directory.join(save_filename(Utc::now()));
    write_map(map, &path)?;
    Ok(path)
}

/// Write the map to an exact path.
pub fn write_map(map: &WorldMap, path: &Path) -> io::Result<()> {
    let save = MapSaveFile {
        version: SAVE_VERSION,
        map: map.clone(),
    };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &save)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Serialization failed: {}", e)))?;
    writer.flush()
}

/// Load a map. Any failure (missing file, unreadable, bad format, newer
/// version) is an `Err` the caller reports and recovers from.
pub fn load_map(path: &Path) -> io::Result<WorldMap> {
    let file = File::open(path)?;
    let save: MapSaveFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Deserialization failed: {}", e),
        )
    })?;

    if save.version > SAVE_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Save file version {} is newer than supported version {}",
                save.version, SAVE_VERSION,
            ),
        ));
    }

    Ok(save.map)
}

/// Saved map files in `directory`, sorted by filename. Timestamped names
/// make this chronological, which is all the menu needs for stable
/// indexing. A missing directory is just an empty list.
pub fn list_saved(directory: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(directory) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == SAVE_EXTENSION).unwrap_or(false))
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::settlement::{Settlement, SettlementId, SettlementKind};
    use crate::terrain::TerrainType;
    use crate::tilemap::Tilemap;

    fn sample_map() -> WorldMap {
        let mut tiles = Tilemap::new_with(12, 8, TerrainType::Grassland);
        tiles.set(3, 3, TerrainType::River);
        tiles.set(11, 7, TerrainType::Mountain);
        let settlements = vec![Settlement {
            id: SettlementId(0),
            kind: SettlementKind::Town,
            x: 4,
            y: 3,
            name: "Taerloch".to_string(),
            liege: None,
        }];
        WorldMap::new(tiles, settlements, Some(99), "sample".to_string())
    }

    #[test]
    fn test_save_filename_format() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(save_filename(at), "map_20240101_120000.realm");

        let later = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        assert!(save_filename(later) > save_filename(at));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let map = sample_map();
        let path = save_map(&map, dir.path()).unwrap();

        let loaded = load_map(&path).unwrap();
        assert_eq!(loaded.width, map.width);
        assert_eq!(loaded.height, map.height);
        assert_eq!(loaded.seed, Some(99));
        assert_eq!(loaded.name, "sample");
        assert_eq!(*loaded.tiles.get(3, 3), TerrainType::River);
        assert_eq!(*loaded.tiles.get(11, 7), TerrainType::Mountain);
        assert_eq!(loaded.settlements.len(), 1);
        assert_eq!(loaded.settlements[0].name, "Taerloch");
    }

    #[test]
    fn test_load_missing_file_is_err_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_map(&dir.path().join("no_such.realm"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_newer_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.realm");
        let save = MapSaveFile {
            version: SAVE_VERSION + 1,
            map: sample_map(),
        };
        serde_json::to_writer(File::create(&path).unwrap(), &save).unwrap();
        assert!(load_map(&path).is_err());
    }

    #[test]
    fn test_list_saved_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let map = sample_map();
        write_map(&map, &dir.path().join("map_20240101_130000.realm")).unwrap();
        write_map(&map, &dir.path().join("map_20240101_120000.realm")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let listed = list_saved(dir.path());
        assert_eq!(listed.len(), 2);
        assert!(listed[0].file_name().unwrap().to_str().unwrap() < listed[1].file_name().unwrap().to_str().unwrap());

        // Missing directory lists empty.
        assert!(list_saved(&dir.path().join("missing")).is_empty());
    }
}
