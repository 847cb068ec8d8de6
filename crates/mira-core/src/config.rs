//! Front panel configuration.
//!
//! A single immutable [`Config`] is built at startup and passed by reference
//! to every component constructor. Every field carries a default, so a partial
//! config file only overrides what it names.

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{ Item, StrftimeItems };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::preset::{ ButtonDefaults, Station };


/// Most preset buttons a single page may hold.
pub const MAX_PAGE_SIZE: usize = 256;


/// Errors that make a configuration unusable. These are fatal at startup.
#[derive( Debug, Error, PartialEq, Eq )]
pub enum ConfigError {
    #[error( "Invalid page size: {columns} columns x {rows} rows" )]
    InvalidPageSize { columns: usize, rows: usize },

    #[error( "Page size must be at least 1" )]
    ZeroPageSize,

    #[error( "A pager needs at least one preset" )]
    EmptyCatalog,

    #[error( "Missing default button color: {0}" )]
    MissingDefaultColor( &'static str ),

    #[error( "Player path is empty" )]
    EmptyPlayerPath,

    #[error( "Invalid interval: {0} must be greater than zero" )]
    ZeroInterval( &'static str ),

    #[error( "Invalid clock format: {0}" )]
    InvalidClockFormat( String ),
}


/// Complete front panel configuration.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct Config {
    pub player: PlayerConfig,
    pub link: LinkConfig,
    pub status: StatusConfig,
    pub spacing: SpacingConfig,
    pub buttons: ButtonsConfig,
    pub page_selector: PageSelectorConfig,
    pub title: TitleConfig,
    pub display: DisplayConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub stations: Vec<Station>,
}


/// External media player client.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct PlayerConfig {
    /// Path to the `mpc` binary
    pub mpc_path: PathBuf,
}


/// Link quality probe shown in the title bar.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct LinkConfig {
    pub enabled: bool,

    /// Program and arguments of the diagnostic command
    pub command: Vec<String>,
}


/// Status area: two text lines under the title bar.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct StatusConfig {
    pub background_color: String,
    pub text_color: String,

    /// Line 1 text while no preset is active
    pub idle_text: String,

    /// Delay before the first "now playing" refresh after a preset starts
    pub initial_refresh_ms: u64,

    /// Steady interval between later refreshes
    pub refresh_interval_ms: u64,
}


/// Band between the status area and the button grid. Height 0 hides it.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct SpacingConfig {
    pub height: u16,
    pub background_color: String,
}


/// Preset button grid.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct ButtonsConfig {
    pub columns: usize,
    pub rows: usize,
    pub background_color: String,
    pub text_color: String,
}


/// Page selector row under the grid.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct PageSelectorConfig {
    pub background_color: String,
    pub text_color: String,
}


/// Title bar with clock and link quality.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct TitleConfig {
    pub text: String,

    /// strftime-style clock format
    pub clock_format: String,
    pub refresh_secs: u64,
}


/// Panel size in terminal cells when not running fullscreen.
#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
}


#[derive( Debug, Clone, Serialize, Deserialize )]
#[serde( default )]
pub struct PathsConfig {
    pub state_file: PathBuf,
    pub log_file: PathBuf,
}


#[derive( Debug, Clone, Default, Serialize, Deserialize )]
#[serde( default )]
pub struct LoggingConfig {
    /// Log at debug level instead of info
    pub verbose: bool,
}


impl Default for Config {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            link: LinkConfig::default(),
            status: StatusConfig::default(),
            spacing: SpacingConfig::default(),
            buttons: ButtonsConfig::default(),
            page_selector: PageSelectorConfig::default(),
            title: TitleConfig::default(),
            display: DisplayConfig::default(),
            paths: PathsConfig::default(),
            logging: LoggingConfig::default(),
            stations: default_stations(),
        }
    }
}


impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mpc_path: PathBuf::from( "/usr/bin/mpc" ),
        }
    }
}


impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec![ "iwconfig".to_string(), "wlan0".to_string() ],
        }
    }
}


impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            background_color: "yellow".to_string(),
            text_color: "black".to_string(),
            idle_text: "No preset active".to_string(),
            initial_refresh_ms: 2_000,
            refresh_interval_ms: 10_000,
        }
    }
}


impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            height: 1,
            background_color: "grey".to_string(),
        }
    }
}


impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 4,
            background_color: "red".to_string(),
            text_color: "black".to_string(),
        }
    }
}


impl Default for PageSelectorConfig {
    fn default() -> Self {
        Self {
            background_color: "grey".to_string(),
            text_color: "black".to_string(),
        }
    }
}


impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            text: "MIRa".to_string(),
            clock_format: "%H:%M".to_string(),
            refresh_secs: 10,
        }
    }
}


impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}


impl Default for PathsConfig {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            state_file: dir.join( "state.json" ),
            log_file: dir.join( "mira.log" ),
        }
    }
}


impl StatusConfig {
    pub fn initial_refresh( &self ) -> Duration {
        Duration::from_millis( self.initial_refresh_ms )
    }


    pub fn refresh_interval( &self ) -> Duration {
        Duration::from_millis( self.refresh_interval_ms )
    }
}


impl ButtonsConfig {
    /// Number of preset buttons on one page.
    pub fn page_size( &self ) -> Result<usize, ConfigError> {
        let invalid = || ConfigError::InvalidPageSize { columns: self.columns, rows: self.rows };

        if self.columns == 0 || self.rows == 0 {
            return Err( invalid() );
        }
        self.columns.checked_mul( self.rows )
            .filter( |size| *size <= MAX_PAGE_SIZE )
            .ok_or_else( invalid )
    }


    /// Colors inherited by stations that do not set their own.
    pub fn defaults( &self ) -> ButtonDefaults {
        ButtonDefaults {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
        }
    }
}


impl TitleConfig {
    pub fn refresh_interval( &self ) -> Duration {
        Duration::from_secs( self.refresh_secs )
    }
}


impl Config {
    /// Checks the rules that must hold before the panel is shown.
    pub fn validate( &self ) -> Result<(), ConfigError> {
        self.buttons.page_size()?;

        if self.buttons.background_color.trim().is_empty() {
            return Err( ConfigError::MissingDefaultColor( "background_color" ) );
        }
        if self.buttons.text_color.trim().is_empty() {
            return Err( ConfigError::MissingDefaultColor( "text_color" ) );
        }

        if self.player.mpc_path.as_os_str().is_empty() {
            return Err( ConfigError::EmptyPlayerPath );
        }

        if self.status.refresh_interval_ms == 0 {
            return Err( ConfigError::ZeroInterval( "status.refresh_interval_ms" ) );
        }
        if self.title.refresh_secs == 0 {
            return Err( ConfigError::ZeroInterval( "title.refresh_secs" ) );
        }

        if StrftimeItems::new( &self.title.clock_format ).any( |item| matches!( item, Item::Error ) ) {
            return Err( ConfigError::InvalidClockFormat( self.title.clock_format.clone() ) );
        }

        Ok(())
    }
}


/// Directory holding the state file and log by default.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else( || PathBuf::from( "." ) )
        .join( "mira" )
}


/// Built-in station list used when the config file names none.
fn default_stations() -> Vec<Station> {
    let mut stations = vec![
        Station::new( "Radio Swiss Pop", "https://stream.srg-ssr.ch/m/rsp/aacp_96" )
            .with_colors( "green", "blue" ),
        Station::new( "Radio BOB!", "http://streams.radiobob.de/bob-national/mp3-192/mediaplayer" )
            .with_colors( "yellow", "blue" ),
    ];
    stations.extend( ( 3..=8 ).map( |n| Station::new( format!( "Radio {}", n ), "https://radio1.de" ) ) );
    stations
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!( config.validate(), Ok(()) );
        assert_eq!( config.buttons.page_size(), Ok( 8 ) );
        assert_eq!( config.stations.len(), 8 );
        assert!( config.paths.state_file.ends_with( "mira/state.json" ) );
    }


    #[test]
    fn test_zero_columns_fails_fast() {
        let mut config = Config::default();
        config.buttons.columns = 0;
        assert_eq!(
            config.validate(),
            Err( ConfigError::InvalidPageSize { columns: 0, rows: 4 } )
        );
    }


    #[test]
    fn test_oversized_page_fails_fast() {
        let mut config = Config::default();
        config.buttons.columns = usize::MAX / 2 + 1;
        config.buttons.rows = 2;
        assert!( matches!( config.validate(), Err( ConfigError::InvalidPageSize { .. } ) ) );

        config.buttons.columns = 1000;
        config.buttons.rows = 1000;
        assert_eq!(
            config.validate(),
            Err( ConfigError::InvalidPageSize { columns: 1000, rows: 1000 } )
        );

        config.buttons.columns = 16;
        config.buttons.rows = 16;
        assert_eq!( config.buttons.page_size(), Ok( MAX_PAGE_SIZE ) );
        assert_eq!( config.validate(), Ok(()) );
    }


    #[test]
    fn test_zero_rows_fails_fast() {
        let mut config = Config::default();
        config.buttons.rows = 0;
        assert!( matches!( config.validate(), Err( ConfigError::InvalidPageSize { .. } ) ) );
    }


    #[test]
    fn test_empty_default_color_rejected() {
        let mut config = Config::default();
        config.buttons.text_color = "  ".to_string();
        assert_eq!( config.validate(), Err( ConfigError::MissingDefaultColor( "text_color" ) ) );
    }


    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut config = Config::default();
        config.status.refresh_interval_ms = 0;
        assert!( matches!( config.validate(), Err( ConfigError::ZeroInterval( _ ) ) ) );
    }


    #[test]
    fn test_bad_clock_format_rejected() {
        let mut config = Config::default();
        config.title.clock_format = "%H:%".to_string();
        assert!( matches!( config.validate(), Err( ConfigError::InvalidClockFormat( _ ) ) ) );
    }


    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [buttons]
            columns = 3

            [[stations]]
            name = "Only"
            url = "http://only.example/stream"
            "#,
        ).unwrap();

        assert_eq!( config.buttons.columns, 3 );
        assert_eq!( config.buttons.rows, 4 );
        assert_eq!( config.status.idle_text, "No preset active" );
        assert_eq!( config.stations.len(), 1 );
        assert_eq!( config.stations[ 0 ].background_color, None );
    }
}
