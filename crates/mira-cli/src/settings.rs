//! Config file loading
//!
//! Reads the TOML config from the user's config directory. A missing file
//! means built-in defaults; a file that does not parse or validate is fatal.

use std::fs;
use std::path::{ Path, PathBuf };

use anyhow::{ Context, Result };
use mira_core::Config;


/// Returns the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map( |p| p.join( "mira" ).join( "config.toml" ) )
}


/// Loads and validates the config from the default location.
pub fn load() -> Result<Config> {
    match config_path() {
        Some( path ) => load_from( &path ),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok( config )
        }
    }
}


/// Loads and validates the config at `path`, or defaults if it does not exist.
pub fn load_from( path: &Path ) -> Result<Config> {
    let config = if path.exists() {
        let contents = fs::read_to_string( path )
            .with_context( || format!( "Failed to read config {}", path.display() ) )?;
        toml::from_str::<Config>( &contents )
            .with_context( || format!( "Failed to parse config {}", path.display() ) )?
    } else {
        Config::default()
    };

    config.validate()
        .with_context( || format!( "Invalid config {}", path.display() ) )?;
    Ok( config )
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from( &dir.path().join( "config.toml" ) ).unwrap();
        assert_eq!( config.buttons.page_size(), Ok( 8 ) );
        assert_eq!( config.stations.len(), 8 );
    }


    #[test]
    fn test_reads_stations_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "config.toml" );
        fs::write( &path, r#"
[buttons]
columns = 3
rows = 2

[paths]
state_file = "/tmp/mira-test/state.json"

[[stations]]
name = "Radio Swiss Pop"
url = "https://stream.srg-ssr.ch/m/rsp/aacp_96"
background_color = "green"
text_color = "blue"

[[stations]]
name = "No URL"
"# ).unwrap();

        let config = load_from( &path ).unwrap();
        assert_eq!( config.buttons.page_size(), Ok( 6 ) );
        assert_eq!( config.paths.state_file, PathBuf::from( "/tmp/mira-test/state.json" ) );
        assert_eq!( config.stations.len(), 2 );
        assert_eq!( config.stations[ 0 ].background_color.as_deref(), Some( "green" ) );
    }


    #[test]
    fn test_zero_columns_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "config.toml" );
        fs::write( &path, "[buttons]\ncolumns = 0\n" ).unwrap();

        assert!( load_from( &path ).is_err() );
    }


    #[test]
    fn test_unparsable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "config.toml" );
        fs::write( &path, "[buttons\ncolumns = " ).unwrap();

        assert!( load_from( &path ).is_err() );
    }
}
