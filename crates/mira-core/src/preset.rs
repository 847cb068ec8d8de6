//! Presets and the preset catalog
//!
//! Turns the configured station list into an ordered, numbered set of presets.

use serde::{ Deserialize, Serialize };


/// Name of the placeholder preset used when no station has a URL.
pub const PLACEHOLDER_NAME: &str = "Radio 1";

/// Stream of the placeholder preset.
pub const PLACEHOLDER_URL: &str = "https://stream.srg-ssr.ch/m/rsp/aacp_96";


/// A station entry as written in the config file. Every field is optional;
/// entries without a usable URL are dropped when the catalog is built.
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct Station {
    #[serde( skip_serializing_if = "Option::is_none" )]
    pub name: Option<String>,

    #[serde( skip_serializing_if = "Option::is_none" )]
    pub url: Option<String>,

    #[serde( skip_serializing_if = "Option::is_none" )]
    pub background_color: Option<String>,

    #[serde( skip_serializing_if = "Option::is_none" )]
    pub text_color: Option<String>,
}


impl Station {
    pub fn new( name: impl Into<String>, url: impl Into<String> ) -> Self {
        Self {
            name: Some( name.into() ),
            url: Some( url.into() ),
            ..Self::default()
        }
    }


    pub fn with_colors( mut self, background: impl Into<String>, text: impl Into<String> ) -> Self {
        self.background_color = Some( background.into() );
        self.text_color = Some( text.into() );
        self
    }


    /// Returns the trimmed URL if it is present and non-empty.
    fn usable_url( &self ) -> Option<&str> {
        self.url.as_deref()
            .map( str::trim )
            .filter( |url| !url.is_empty() )
    }
}


/// Button colors inherited by stations that do not set their own.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ButtonDefaults {
    pub background_color: String,
    pub text_color: String,
}


/// A predefined internet radio station.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Preset {
    /// Position in the catalog; the only identity that is persisted.
    pub number: usize,
    pub name: String,
    pub url: String,
    pub background_color: String,
    pub text_color: String,
}


impl Preset {
    fn from_station( number: usize, url: &str, station: &Station, defaults: &ButtonDefaults ) -> Self {
        let name = station.name.as_deref()
            .map( str::trim )
            .filter( |name| !name.is_empty() )
            .map( str::to_string )
            .unwrap_or_else( || format!( "Radio {}", number + 1 ) );

        Self {
            number,
            name,
            url: url.to_string(),
            background_color: station.background_color.clone()
                .unwrap_or_else( || defaults.background_color.clone() ),
            text_color: station.text_color.clone()
                .unwrap_or_else( || defaults.text_color.clone() ),
        }
    }


    fn placeholder( defaults: &ButtonDefaults ) -> Self {
        Self {
            number: 0,
            name: PLACEHOLDER_NAME.to_string(),
            url: PLACEHOLDER_URL.to_string(),
            background_color: defaults.background_color.clone(),
            text_color: defaults.text_color.clone(),
        }
    }
}


/// Ordered, immutable set of presets. Never empty; numbers are `0..len()`.
#[derive( Debug, Clone )]
pub struct Catalog {
    presets: Vec<Preset>,
}


impl Catalog {
    /// Builds the catalog from raw station entries.
    ///
    /// Entries without a non-empty URL are skipped. Survivors are numbered
    /// by position. An empty result is replaced by a single placeholder.
    pub fn build( stations: &[Station], defaults: &ButtonDefaults ) -> Self {
        let mut presets: Vec<Preset> = stations.iter()
            .filter_map( |station| station.usable_url().map( |url| ( station, url ) ) )
            .enumerate()
            .map( |( number, ( station, url ) )| Preset::from_station( number, url, station, defaults ) )
            .collect();

        let skipped = stations.len() - presets.len();
        if skipped > 0 {
            tracing::warn!( "Skipped {} station(s) without a URL", skipped );
        }

        if presets.is_empty() {
            tracing::warn!( "No usable stations configured, using placeholder preset" );
            presets.push( Preset::placeholder( defaults ) );
        }

        Self { presets }
    }


    /// Gets a preset by number.
    pub fn get( &self, number: usize ) -> Option<&Preset> {
        self.presets.get( number )
    }


    /// Gets the presets whose numbers fall in `range`.
    pub fn slice( &self, range: std::ops::Range<usize> ) -> &[Preset] {
        let end = range.end.min( self.presets.len() );
        let start = range.start.min( end );
        &self.presets[ start..end ]
    }


    pub fn presets( &self ) -> &[Preset] {
        &self.presets
    }


    pub fn len( &self ) -> usize {
        self.presets.len()
    }


    /// Whether the catalog holds no presets.
    pub fn is_empty( &self ) -> bool {
        self.presets.is_empty()
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    fn defaults() -> ButtonDefaults {
        ButtonDefaults {
            background_color: "red".to_string(),
            text_color: "black".to_string(),
        }
    }


    #[test]
    fn test_numbers_are_contiguous_in_input_order() {
        let stations = vec![
            Station::new( "A", "http://a" ),
            Station::new( "B", "" ),
            Station { name: Some( "C".into() ), ..Station::default() },
            Station::new( "D", "http://d" ),
            Station::new( "E", "  http://e  " ),
        ];

        let catalog = Catalog::build( &stations, &defaults() );

        let names: Vec<&str> = catalog.presets().iter().map( |p| p.name.as_str() ).collect();
        assert_eq!( names, [ "A", "D", "E" ] );
        for ( i, preset ) in catalog.presets().iter().enumerate() {
            assert_eq!( preset.number, i );
        }
        assert_eq!( catalog.get( 2 ).unwrap().url, "http://e" );
    }


    #[test]
    fn test_empty_input_gives_placeholder() {
        let catalog = Catalog::build( &[], &defaults() );
        assert_eq!( catalog.len(), 1 );

        let preset = catalog.get( 0 ).unwrap();
        assert_eq!( preset.number, 0 );
        assert_eq!( preset.name, PLACEHOLDER_NAME );
        assert_eq!( preset.url, PLACEHOLDER_URL );
        assert_eq!( preset.background_color, "red" );
    }


    #[test]
    fn test_all_filtered_gives_placeholder() {
        let stations = vec![ Station::new( "X", " " ), Station::default() ];
        let catalog = Catalog::build( &stations, &defaults() );
        assert_eq!( catalog.len(), 1 );
        assert_eq!( catalog.get( 0 ).unwrap().name, PLACEHOLDER_NAME );
    }


    #[test]
    fn test_colors_inherit_defaults() {
        let stations = vec![
            Station::new( "Own", "http://own" ).with_colors( "green", "blue" ),
            Station::new( "Inherit", "http://inherit" ),
            Station {
                text_color: Some( "white".into() ),
                ..Station::new( "Half", "http://half" )
            },
        ];

        let catalog = Catalog::build( &stations, &defaults() );

        let own = catalog.get( 0 ).unwrap();
        assert_eq!( ( own.background_color.as_str(), own.text_color.as_str() ), ( "green", "blue" ) );
        let inherit = catalog.get( 1 ).unwrap();
        assert_eq!( ( inherit.background_color.as_str(), inherit.text_color.as_str() ), ( "red", "black" ) );
        let half = catalog.get( 2 ).unwrap();
        assert_eq!( ( half.background_color.as_str(), half.text_color.as_str() ), ( "red", "white" ) );
    }


    #[test]
    fn test_missing_name_gets_numbered_label() {
        let stations = vec![
            Station::new( "First", "http://1" ),
            Station { url: Some( "http://2".into() ), ..Station::default() },
        ];
        let catalog = Catalog::build( &stations, &defaults() );
        assert_eq!( catalog.get( 1 ).unwrap().name, "Radio 2" );
    }


    #[test]
    fn test_slice_clamps_to_catalog() {
        let stations: Vec<Station> = ( 0..5 )
            .map( |i| Station::new( format!( "S{}", i ), format!( "http://{}", i ) ) )
            .collect();
        let catalog = Catalog::build( &stations, &defaults() );

        assert_eq!( catalog.slice( 4..8 ).len(), 1 );
        assert_eq!( catalog.slice( 4..8 )[ 0 ].number, 4 );
        assert!( catalog.slice( 9..12 ).is_empty() );
    }
}
