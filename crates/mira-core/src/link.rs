//! Wireless link quality for the title bar.

use std::process::Command;

use crate::config::LinkConfig;


const QUALITY_TOKEN: &str = "Link Quality=";


/// Source of the current link quality, in percent.
pub trait LinkProbe {
    /// Returns the link quality, or `None` when it is unknown.
    fn quality( &mut self ) -> Option<u32>;
}


/// Runs a diagnostic command (such as `iwconfig wlan0`) and parses its output.
#[derive( Debug, Clone )]
pub struct CommandProbe {
    command: Vec<String>,
}


impl CommandProbe {
    pub fn new( command: Vec<String> ) -> Self {
        Self { command }
    }
}


impl LinkProbe for CommandProbe {
    fn quality( &mut self ) -> Option<u32> {
        let ( program, args ) = self.command.split_first()?;

        let output = match Command::new( program ).args( args ).output() {
            Ok( output ) => output,
            Err( e ) => {
                tracing::warn!( "Link probe '{}' failed: {}", program, e );
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!( "Link probe '{}' exited with {}", program, output.status );
        }

        parse_link_quality( &String::from_utf8_lossy( &output.stdout ) )
    }
}


/// Probe used when link reporting is switched off.
#[derive( Debug, Clone, Copy, Default )]
pub struct NoProbe;


impl LinkProbe for NoProbe {
    fn quality( &mut self ) -> Option<u32> {
        None
    }
}


/// Probe selected by the link configuration.
#[derive( Debug, Clone )]
pub enum ConfiguredProbe {
    Command( CommandProbe ),
    Disabled( NoProbe ),
}


impl ConfiguredProbe {
    pub fn from_config( config: &LinkConfig ) -> Self {
        if config.enabled && !config.command.is_empty() {
            ConfiguredProbe::Command( CommandProbe::new( config.command.clone() ) )
        } else {
            ConfiguredProbe::Disabled( NoProbe )
        }
    }
}


impl LinkProbe for ConfiguredProbe {
    fn quality( &mut self ) -> Option<u32> {
        match self {
            ConfiguredProbe::Command( probe ) => probe.quality(),
            ConfiguredProbe::Disabled( probe ) => probe.quality(),
        }
    }
}


/// Finds `Link Quality=<a>/<b>` in probe output and returns `round(a * 100 / b)`.
///
/// Lines are scanned in order; the first one that parses wins.
pub fn parse_link_quality( output: &str ) -> Option<u32> {
    output.lines().find_map( parse_quality_line )
}


fn parse_quality_line( line: &str ) -> Option<u32> {
    let start = line.find( QUALITY_TOKEN )? + QUALITY_TOKEN.len();
    let ratio = line[ start.. ].split_whitespace().next()?;

    let ( value, max ) = ratio.split_once( '/' )?;
    let value: u32 = value.parse().ok()?;
    let max: u32 = max.parse().ok()?;
    if max == 0 {
        return None;
    }

    Some( ( f64::from( value ) * 100.0 / f64::from( max ) ).round() as u32 )
}


#[cfg( test )]
mod tests {
    use super::*;


    const IWCONFIG: &str = "\
wlan0     IEEE 802.11  ESSID:\"home\"
          Mode:Managed  Frequency:2.437 GHz  Access Point: 00:11:22:33:44:55
          Bit Rate=72.2 Mb/s   Tx-Power=31 dBm
          Link Quality=35/70  Signal level=-75 dBm
          Rx invalid nwid:0  Rx invalid crypt:0  Rx invalid frag:0
";


    #[test]
    fn test_parse_iwconfig_output() {
        assert_eq!( parse_link_quality( IWCONFIG ), Some( 50 ) );
    }


    #[test]
    fn test_parse_rounds() {
        assert_eq!( parse_link_quality( "Link Quality=2/3" ), Some( 67 ) );
        assert_eq!( parse_link_quality( "Link Quality=70/70" ), Some( 100 ) );
    }


    #[test]
    fn test_missing_token_is_unknown() {
        assert_eq!( parse_link_quality( "wlan0     no wireless extensions." ), None );
        assert_eq!( parse_link_quality( "" ), None );
    }


    #[test]
    fn test_malformed_ratio_is_unknown() {
        assert_eq!( parse_link_quality( "Link Quality=abc/70" ), None );
        assert_eq!( parse_link_quality( "Link Quality=35" ), None );
        assert_eq!( parse_link_quality( "Link Quality=35/0" ), None );
    }


    #[test]
    fn test_later_line_used_when_first_is_malformed() {
        let output = "wlan0  Link Quality=off\nwlan1  Link Quality=56/70  Signal level=-60 dBm\n";
        assert_eq!( parse_link_quality( output ), Some( 80 ) );
    }


    #[test]
    fn test_disabled_config_never_probes() {
        let config = LinkConfig { enabled: false, command: vec![ "iwconfig".into() ] };
        let mut probe = ConfiguredProbe::from_config( &config );
        assert!( matches!( probe, ConfiguredProbe::Disabled( _ ) ) );
        assert_eq!( probe.quality(), None );
    }


    #[test]
    fn test_missing_program_is_unknown() {
        let mut probe = CommandProbe::new( vec![ "/nonexistent/bin/iwconfig".into() ] );
        assert_eq!( probe.quality(), None );
    }
}
