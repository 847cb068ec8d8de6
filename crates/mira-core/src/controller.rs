//! Playback controller
//!
//! Owns the current preset and is the only writer of the persisted playback
//! state. Every selection goes through here: the controller drives the
//! player, keeps the status refresh timer, and updates the panel so the
//! button highlight, page highlight and status text all agree.

use std::time::{ Duration, Instant };

use crate::command::{ parse_now_playing, PlayerCommand };
use crate::config::{ Config, ConfigError };
use crate::link::LinkProbe;
use crate::pager::Pager;
use crate::panel::{ Panel, PanelEvent, StatusLines };
use crate::player::PlayerControl;
use crate::preset::{ Catalog, Preset };
use crate::state::StateStore;
use crate::timer::PeriodicTask;


/// What the radio is doing.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Selection {
    NoSelection,
    Playing( Preset ),
}


/// Orchestrates selection, player control, persistence and indicators.
pub struct Controller<P, L> {
    catalog: Catalog,
    pager: Pager,
    columns: usize,
    store: StateStore,
    player: P,
    probe: L,

    idle_text: String,
    clock_format: String,
    initial_refresh: Duration,
    refresh_interval: Duration,
    title_interval: Duration,

    selection: Selection,
    panel: Panel,

    // At most one of each; the status task is replaced on every Play
    status_task: Option<PeriodicTask>,
    title_task: Option<PeriodicTask>,
}


impl<P: PlayerControl, L: LinkProbe> Controller<P, L> {
    /// Creates a controller in the `NoSelection` state. Call [`startup`](Self::startup)
    /// before handling events.
    pub fn new(
        config: &Config,
        catalog: Catalog,
        store: StateStore,
        player: P,
        probe: L,
    ) -> Result<Self, ConfigError> {
        let pager = Pager::new( catalog.len(), config.buttons.page_size()? )?;

        let mut panel = Panel::default();
        panel.set_page_count( pager.page_count() );

        Ok( Self {
            catalog,
            pager,
            columns: config.buttons.columns,
            store,
            player,
            probe,
            idle_text: config.status.idle_text.clone(),
            clock_format: config.title.clock_format.clone(),
            initial_refresh: config.status.initial_refresh(),
            refresh_interval: config.status.refresh_interval(),
            title_interval: config.title.refresh_interval(),
            selection: Selection::NoSelection,
            panel,
            status_task: None,
            title_task: None,
        })
    }


    /// Restores the last selected preset and shows its page.
    ///
    /// A restored preset starts playing again but is not written back.
    /// Without one the panel shows page 0 and the idle status text.
    pub fn startup( &mut self, now: Instant ) {
        let restored = self.store.load().and_then( |number| {
            let preset = self.catalog.get( number ).cloned();
            if preset.is_none() {
                tracing::warn!(
                    "Stored preset {} is out of range ({} presets), ignoring",
                    number,
                    self.catalog.len()
                );
            }
            preset
        });

        match restored {
            Some( preset ) => {
                tracing::info!( "Resuming preset {} ({})", preset.number, preset.name );
                let page = self.pager.page_of( preset.number );
                self.play( &preset, now );
                self.selection = Selection::Playing( preset );
                self.show_page( page );
            }
            None => {
                tracing::info!( "No preset to resume" );
                self.selection = Selection::NoSelection;
                self.panel.status = StatusLines {
                    line1: self.idle_text.clone(),
                    line2: String::new(),
                };
                self.show_page( 0 );
            }
        }

        self.title_task = Some( PeriodicTask::start( now, self.title_interval, self.title_interval ) );
        self.refresh_title();
    }


    /// Routes a panel event to the matching operation.
    pub fn handle( &mut self, event: PanelEvent, now: Instant ) {
        match event {
            PanelEvent::PresetSelected( number ) => self.select( number, now ),
            PanelEvent::PageSelected( page ) => self.select_page( page ),
        }
    }


    /// Plays preset `number`, persists it and moves the button highlight to it.
    ///
    /// The displayed page is left alone.
    pub fn select( &mut self, number: usize, now: Instant ) {
        let Some( preset ) = self.catalog.get( number ).cloned() else {
            tracing::warn!( "Ignoring selection of unknown preset {}", number );
            return;
        };

        tracing::info!( "Selected preset {} ({})", preset.number, preset.name );

        self.play( &preset, now );
        self.selection = Selection::Playing( preset );
        self.persist();
        self.panel.highlight_preset( self.current_number() );
    }


    /// Shows `page` in the grid and moves the page highlight to it.
    pub fn select_page( &mut self, page: usize ) {
        if !self.pager.contains_page( page ) {
            tracing::warn!( "Ignoring selection of unknown page {}", page );
            return;
        }

        tracing::debug!( "Showing page {}", page );
        self.show_page( page );
    }


    /// Runs whichever periodic tasks are due.
    pub fn tick( &mut self, now: Instant ) {
        if self.status_task.as_mut().is_some_and( |task| task.poll( now ) ) {
            self.refresh_status();
        }

        if self.title_task.as_mut().is_some_and( |task| task.poll( now ) ) {
            self.refresh_title();
        }
    }


    /// Earliest time at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline( &self ) -> Option<Instant> {
        [ self.status_task, self.title_task ]
            .iter()
            .flatten()
            .map( PeriodicTask::next_due )
            .min()
    }


    pub fn panel( &self ) -> &Panel {
        &self.panel
    }


    pub fn selection( &self ) -> &Selection {
        &self.selection
    }


    pub fn current_preset( &self ) -> Option<&Preset> {
        match &self.selection {
            Selection::Playing( preset ) => Some( preset ),
            Selection::NoSelection => None,
        }
    }


    /// Index of the page currently shown in the grid.
    pub fn current_page( &self ) -> usize {
        self.panel.displayed_page()
    }


    pub fn pager( &self ) -> &Pager {
        &self.pager
    }


    pub fn status_refresh_active( &self ) -> bool {
        self.status_task.is_some()
    }


    pub fn title_refresh_active( &self ) -> bool {
        self.title_task.is_some()
    }


    pub fn player( &self ) -> &P {
        &self.player
    }


    fn current_number( &self ) -> Option<usize> {
        self.current_preset().map( |preset| preset.number )
    }


    /// Starts `preset` on the player and restarts the status refresh.
    fn play( &mut self, preset: &Preset, now: Instant ) {
        if self.status_task.take().is_some() {
            tracing::debug!( "Cancelled status refresh" );
        }

        self.send( &PlayerCommand::Clear );
        self.send( &PlayerCommand::Add { url: preset.url.clone() } );
        self.send( &PlayerCommand::Play );

        self.panel.status = StatusLines {
            line1: preset.name.clone(),
            line2: String::new(),
        };

        self.status_task = Some( PeriodicTask::start( now, self.initial_refresh, self.refresh_interval ) );
    }


    fn persist( &self ) {
        let Selection::Playing( preset ) = &self.selection else {
            return;
        };

        if let Err( e ) = self.store.save( preset.number, &preset.name ) {
            tracing::warn!( "Failed to save playback state: {}", e );
        }
    }


    fn show_page( &mut self, page: usize ) {
        let presets = self.catalog.slice( self.pager.range_of( page ) );
        self.panel.render_page( page, presets, self.columns );
        self.panel.highlight_page( page );
        self.panel.highlight_preset( self.current_number() );
    }


    /// Runs a player command; failures are logged and read as empty output.
    fn send( &mut self, command: &PlayerCommand ) -> String {
        match self.player.run( command ) {
            Ok( output ) => output,
            Err( e ) => {
                tracing::error!( "Player command '{}' failed: {}", command, e );
                String::new()
            }
        }
    }


    fn refresh_status( &mut self ) {
        let output = match self.player.run( &PlayerCommand::Current ) {
            Ok( output ) => output,
            Err( e ) => {
                tracing::error!( "Player command '{}' failed: {}", PlayerCommand::Current, e );
                return;
            }
        };

        let text = parse_now_playing( &output );
        if text != self.panel.status.line2 {
            tracing::debug!( "Now playing: {:?}", text );
        }
        self.panel.status.line2 = text;
    }


    fn refresh_title( &mut self ) {
        self.panel.title.clock = chrono::Local::now().format( &self.clock_format ).to_string();
        self.panel.title.link_quality = self.probe.quality();
    }
}


#[cfg( test )]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::player::PlayerError;
    use crate::preset::Station;


    /// Records every command; answers "current" with a canned reply.
    #[derive( Default )]
    struct RecordingPlayer {
        commands: Vec<PlayerCommand>,
        current: String,
        fail: bool,
    }


    impl PlayerControl for RecordingPlayer {
        fn run( &mut self, command: &PlayerCommand ) -> Result<String, PlayerError> {
            self.commands.push( command.clone() );
            if self.fail {
                return Err( PlayerError::Failed {
                    command: command.to_string(),
                    status: "exit status: 1".into(),
                    stderr: "error: Connection refused".into(),
                });
            }
            match command {
                PlayerCommand::Current => Ok( self.current.clone() ),
                _ => Ok( String::new() ),
            }
        }
    }


    struct FixedProbe( Option<u32> );


    impl LinkProbe for FixedProbe {
        fn quality( &mut self ) -> Option<u32> {
            self.0
        }
    }


    fn config( columns: usize, rows: usize ) -> Config {
        let mut config = Config::default();
        config.buttons.columns = columns;
        config.buttons.rows = rows;
        config.stations = ( 0..8 )
            .map( |i| Station::new( format!( "Radio {}", i + 1 ), format!( "http://radio/{}", i ) ) )
            .collect();
        config
    }


    fn controller_with(
        config: &Config,
        state_path: &Path,
        player: RecordingPlayer,
    ) -> Controller<RecordingPlayer, FixedProbe> {
        let catalog = Catalog::build( &config.stations, &config.buttons.defaults() );
        Controller::new( config, catalog, StateStore::new( state_path ), player, FixedProbe( Some( 50 ) ) )
            .unwrap()
    }


    fn count_current( controller: &Controller<RecordingPlayer, FixedProbe> ) -> usize {
        controller.player().commands.iter()
            .filter( |c| **c == PlayerCommand::Current )
            .count()
    }


    #[test]
    fn test_startup_without_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), RecordingPlayer::default() );

        controller.startup( Instant::now() );

        assert_eq!( controller.selection(), &Selection::NoSelection );
        assert_eq!( controller.panel().status.line1, "No preset active" );
        assert_eq!( controller.panel().status.line2, "" );
        assert_eq!( controller.current_page(), 0 );
        assert!( controller.panel().pressed_presets().is_empty() );
        assert_eq!( controller.panel().pressed_pages(), [ 0 ] );
        assert!( controller.player().commands.is_empty() );
        assert!( !controller.status_refresh_active() );
        assert!( controller.title_refresh_active() );
    }


    #[test]
    fn test_startup_restores_preset_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        let written = r#"{ "preset_number": 5, "station_name": "written by hand" }"#;
        fs::write( &path, written ).unwrap();

        let mut controller = controller_with( &config( 2, 2 ), &path, RecordingPlayer::default() );
        controller.startup( Instant::now() );

        assert_eq!( controller.current_preset().map( |p| p.number ), Some( 5 ) );
        assert_eq!( controller.current_page(), 1 );
        assert_eq!( controller.panel().pressed_presets(), [ 5 ] );
        assert_eq!( controller.panel().pressed_pages(), [ 1 ] );
        assert_eq!( controller.panel().status.line1, "Radio 6" );
        assert_eq!(
            controller.player().commands,
            [
                PlayerCommand::Clear,
                PlayerCommand::Add { url: "http://radio/5".into() },
                PlayerCommand::Play,
            ]
        );
        assert!( controller.status_refresh_active() );
        assert_eq!( fs::read_to_string( &path ).unwrap(), written );
    }


    #[test]
    fn test_startup_discards_out_of_range_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        fs::write( &path, r#"{ "preset_number": 99 }"# ).unwrap();

        let mut controller = controller_with( &config( 2, 2 ), &path, RecordingPlayer::default() );
        controller.startup( Instant::now() );

        assert_eq!( controller.selection(), &Selection::NoSelection );
        assert_eq!( controller.current_page(), 0 );
        assert!( controller.player().commands.is_empty() );
    }


    #[test]
    fn test_select_plays_persists_and_highlights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        let mut controller = controller_with( &config( 2, 2 ), &path, RecordingPlayer::default() );
        let now = Instant::now();
        controller.startup( now );

        controller.handle( PanelEvent::PresetSelected( 2 ), now );

        assert_eq!(
            controller.player().commands,
            [
                PlayerCommand::Clear,
                PlayerCommand::Add { url: "http://radio/2".into() },
                PlayerCommand::Play,
            ]
        );
        assert_eq!( controller.panel().status.line1, "Radio 3" );
        assert_eq!( controller.panel().status.line2, "" );
        assert_eq!( controller.panel().pressed_presets(), [ 2 ] );
        assert_eq!( StateStore::new( &path ).load(), Some( 2 ) );

        controller.handle( PanelEvent::PresetSelected( 1 ), now );

        assert_eq!( controller.panel().pressed_presets(), [ 1 ] );
        assert_eq!( controller.current_preset().map( |p| p.number ), Some( 1 ) );
        assert_eq!( StateStore::new( &path ).load(), Some( 1 ) );
    }


    #[test]
    fn test_select_off_page_waits_for_page_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), RecordingPlayer::default() );
        let now = Instant::now();
        controller.startup( now );

        assert_eq!( controller.pager().page_count(), 2 );
        let generation = controller.panel().generation();
        let on_page_0: Vec<usize> = controller.panel().grid().iter().map( |s| s.number ).collect();
        assert_eq!( on_page_0, [ 0, 1, 2, 3 ] );

        controller.select( 5, now );

        assert_eq!( controller.panel().generation(), generation );
        assert_eq!( controller.current_page(), 0 );
        assert!( controller.panel().pressed_presets().is_empty() );
        assert_eq!( controller.panel().pressed_pages(), [ 0 ] );

        controller.handle( PanelEvent::PageSelected( 1 ), now );

        assert_eq!( controller.panel().generation(), generation + 1 );
        let on_page_1: Vec<usize> = controller.panel().grid().iter().map( |s| s.number ).collect();
        assert_eq!( on_page_1, [ 4, 5, 6, 7 ] );
        assert_eq!( controller.panel().pressed_presets(), [ 5 ] );
        assert_eq!( controller.panel().pressed_pages(), [ 1 ] );

        controller.select_page( 0 );
        assert!( controller.panel().pressed_presets().is_empty() );
        assert_eq!( controller.panel().pressed_pages(), [ 0 ] );
    }


    #[test]
    fn test_status_refresh_uses_text_after_colon() {
        let dir = tempfile::tempdir().unwrap();
        let player = RecordingPlayer { current: "Artist: Track Title\n".into(), ..RecordingPlayer::default() };
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), player );
        let t0 = Instant::now();
        controller.startup( t0 );
        controller.select( 0, t0 );

        controller.tick( t0 + Duration::from_millis( 1_000 ) );
        assert_eq!( count_current( &controller ), 0 );
        assert_eq!( controller.panel().status.line2, "" );

        controller.tick( t0 + Duration::from_millis( 2_000 ) );
        assert_eq!( count_current( &controller ), 1 );
        assert_eq!( controller.panel().status.line2, "Track Title" );

        // Steady interval after the first refresh
        controller.tick( t0 + Duration::from_millis( 4_000 ) );
        assert_eq!( count_current( &controller ), 1 );
        controller.tick( t0 + Duration::from_millis( 12_000 ) );
        assert_eq!( count_current( &controller ), 2 );
    }


    #[test]
    fn test_status_refresh_without_colon() {
        let dir = tempfile::tempdir().unwrap();
        let player = RecordingPlayer { current: "NoColonHere".into(), ..RecordingPlayer::default() };
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), player );
        let t0 = Instant::now();
        controller.startup( t0 );
        controller.select( 3, t0 );

        controller.tick( t0 + Duration::from_secs( 2 ) );

        assert_eq!( controller.panel().status.line2, "NoColonHere" );
    }


    #[test]
    fn test_status_refresh_clears_line_when_nothing_plays() {
        let dir = tempfile::tempdir().unwrap();
        let player = RecordingPlayer { current: "A: B".into(), ..RecordingPlayer::default() };
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), player );
        let t0 = Instant::now();
        controller.startup( t0 );
        controller.select( 0, t0 );

        controller.tick( t0 + Duration::from_secs( 2 ) );
        assert_eq!( controller.panel().status.line2, "B" );

        // Stream stopped: the player succeeds with no output
        controller.player.current = String::new();
        controller.tick( t0 + Duration::from_secs( 12 ) );

        assert_eq!( count_current( &controller ), 2 );
        assert_eq!( controller.panel().status.line2, "" );
        assert_eq!( controller.panel().status.line1, "Radio 1" );
    }


    #[test]
    fn test_new_selection_replaces_refresh_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let player = RecordingPlayer { current: "A: B".into(), ..RecordingPlayer::default() };
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), player );
        let t0 = Instant::now();
        controller.startup( t0 );

        controller.select( 0, t0 );
        controller.select( 1, t0 + Duration::from_secs( 1 ) );

        // The first schedule would have fired at 2s; only the second one is alive
        controller.tick( t0 + Duration::from_secs( 2 ) );
        assert_eq!( count_current( &controller ), 0 );
        controller.tick( t0 + Duration::from_secs( 3 ) );
        assert_eq!( count_current( &controller ), 1 );
        assert!( controller.status_refresh_active() );
    }


    #[test]
    fn test_player_failure_does_not_block_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join( "state.json" );
        let player = RecordingPlayer { fail: true, ..RecordingPlayer::default() };
        let mut controller = controller_with( &config( 2, 2 ), &path, player );
        let t0 = Instant::now();
        controller.startup( t0 );

        controller.select( 2, t0 );
        controller.panel.status.line2 = "previous".into();
        controller.tick( t0 + Duration::from_secs( 2 ) );

        assert_eq!( controller.current_preset().map( |p| p.number ), Some( 2 ) );
        assert_eq!( controller.panel().status.line1, "Radio 3" );
        assert_eq!( controller.panel().status.line2, "previous" );
        assert_eq!( StateStore::new( &path ).load(), Some( 2 ) );
    }


    #[test]
    fn test_persist_failure_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join( "blocker" );
        fs::write( &blocker, "" ).unwrap();
        let mut controller = controller_with( &config( 2, 2 ), &blocker.join( "state.json" ), RecordingPlayer::default() );
        let now = Instant::now();
        controller.startup( now );

        controller.select( 1, now );

        assert_eq!( controller.current_preset().map( |p| p.number ), Some( 1 ) );
        assert_eq!( controller.panel().pressed_presets(), [ 1 ] );
    }


    #[test]
    fn test_title_refresh_survives_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), RecordingPlayer::default() );
        let t0 = Instant::now();
        controller.startup( t0 );

        assert_eq!( controller.panel().title.link_quality, Some( 50 ) );
        assert!( !controller.panel().title.clock.is_empty() );

        controller.select( 0, t0 );
        assert!( controller.title_refresh_active() );
        assert_eq!(
            controller.next_deadline(),
            Some( t0 + Duration::from_secs( 2 ) )
        );
    }


    #[test]
    fn test_unknown_events_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller_with( &config( 2, 2 ), &dir.path().join( "state.json" ), RecordingPlayer::default() );
        let now = Instant::now();
        controller.startup( now );
        let generation = controller.panel().generation();

        controller.handle( PanelEvent::PresetSelected( 8 ), now );
        controller.handle( PanelEvent::PageSelected( 2 ), now );

        assert_eq!( controller.selection(), &Selection::NoSelection );
        assert_eq!( controller.panel().generation(), generation );
        assert!( controller.player().commands.is_empty() );
    }


    #[test]
    fn test_invalid_page_size_is_config_error() {
        for ( columns, rows ) in [ ( 0, 4 ), ( usize::MAX / 2 + 1, 2 ) ] {
            let config = config( columns, rows );
            let catalog = Catalog::build( &config.stations, &config.buttons.defaults() );
            let result = Controller::new(
                &config,
                catalog,
                StateStore::new( "unused.json" ),
                RecordingPlayer::default(),
                FixedProbe( None ),
            );
            assert!( matches!( result, Err( ConfigError::InvalidPageSize { .. } ) ) );
        }
    }
}
