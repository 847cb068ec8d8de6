//! Persisted playback state
//!
//! Remembers which preset was last selected so it can be resumed after a
//! restart. The store only deals in raw preset numbers; mapping a number back
//! to a preset is up to the caller.

use std::fs;
use std::path::PathBuf;

use serde::{ Deserialize, Serialize };
use thiserror::Error;


/// Errors that can occur while writing the state file.
#[derive( Debug, Error )]
pub enum StateError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Serialization error: {0}" )]
    Serialize( #[from] serde_json::Error ),
}


/// On-disk record. `station_name` is informational and never read back.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
pub struct SavedState {
    pub preset_number: u64,

    #[serde( default, skip_serializing_if = "Option::is_none" )]
    pub station_name: Option<String>,
}


/// JSON file holding the last selected preset number.
#[derive( Debug, Clone )]
pub struct StateStore {
    path: PathBuf,
}


impl StateStore {
    pub fn new( path: impl Into<PathBuf> ) -> Self {
        Self { path: path.into() }
    }


    /// Loads the last selected preset number.
    ///
    /// A missing, unreadable or malformed file yields `None`.
    pub fn load( &self ) -> Option<usize> {
        if !self.path.exists() {
            tracing::debug!( "No playback state at {}", self.path.display() );
            return None;
        }

        let contents = match fs::read_to_string( &self.path ) {
            Ok( contents ) => contents,
            Err( e ) => {
                tracing::warn!( "Failed to read playback state: {}", e );
                return None;
            }
        };

        let saved: SavedState = match serde_json::from_str( &contents ) {
            Ok( saved ) => saved,
            Err( e ) => {
                tracing::warn!( "Ignoring malformed playback state: {}", e );
                return None;
            }
        };

        usize::try_from( saved.preset_number ).ok()
    }


    /// Writes the selected preset number, creating the parent directory if needed.
    pub fn save( &self, preset_number: usize, station_name: &str ) -> Result<(), StateError> {
        if let Some( parent ) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all( parent )?;
            }
        }

        let saved = SavedState {
            preset_number: preset_number as u64,
            station_name: Some( station_name.to_string() ),
        };
        let json = serde_json::to_string_pretty( &saved )?;
        fs::write( &self.path, json )?;

        tracing::debug!( "Saved playback state: preset {}", preset_number );
        Ok(())
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new( dir.path().join( "state.json" ) );

        for k in [ 0, 3, 7 ] {
            store.save( k, "Radio" ).unwrap();
            assert_eq!( store.load(), Some( k ) );
        }
    }


    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "nested" ).join( "deeper" ).join( "state.json" );
        let store = StateStore::new( &path );

        store.save( 2, "Radio BOB!" ).unwrap();

        assert!( path.exists() );
        let contents = fs::read_to_string( &path ).unwrap();
        assert!( contents.contains( "\"station_name\": \"Radio BOB!\"" ) );
        assert_eq!( store.load(), Some( 2 ) );
    }


    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new( dir.path().join( "absent.json" ) );
        assert_eq!( store.load(), None );
    }


    #[test]
    fn test_corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        let store = StateStore::new( &path );

        for contents in [
            "not json at all",
            "{}",
            r#"{ "preset_number": "3" }"#,
            r#"{ "preset_number": -1 }"#,
            r#"{ "preset_number": 2.5 }"#,
            "",
        ] {
            fs::write( &path, contents ).unwrap();
            assert_eq!( store.load(), None, "contents: {:?}", contents );
        }
    }


    #[test]
    fn test_station_name_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        fs::write( &path, r#"{ "preset_number": 5 }"# ).unwrap();

        assert_eq!( StateStore::new( &path ).load(), Some( 5 ) );
    }


    #[test]
    fn test_unwritable_location_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join( "file" );
        fs::write( &blocker, "" ).unwrap();
        let store = StateStore::new( blocker.join( "state.json" ) );

        assert!( store.save( 1, "Radio" ).is_err() );
    }
}
