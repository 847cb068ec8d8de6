//! Command-line argument parsing for MIRa.

use clap::Parser;


/// MIRa - Minimalist Internet Radio front panel.
#[derive( Parser, Debug )]
#[command( name = "mira" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Use the whole terminal instead of the configured display size.
    #[arg( short, long )]
    pub fullscreen: bool,
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_default_is_windowed() {
        let args = Args::try_parse_from([ "mira" ]).unwrap();
        assert!( !args.fullscreen );
    }


    #[test]
    fn test_fullscreen_flag() {
        assert!( Args::try_parse_from([ "mira", "--fullscreen" ]).unwrap().fullscreen );
        assert!( Args::try_parse_from([ "mira", "-f" ]).unwrap().fullscreen );
    }


    #[test]
    fn test_rejects_unknown_flags() {
        assert!( Args::try_parse_from([ "mira", "--browse" ]).is_err() );
    }
}
