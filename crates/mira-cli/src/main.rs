//! MIRa CLI - Touchscreen front panel for internet radio

mod cli;
mod input;
mod layout;
mod settings;

use std::fs::{ self, OpenOptions };
use std::io::{ self, Stdout };
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{ Duration, Instant };

use anyhow::{ Context, Result };
use clap::Parser;
use crossterm::{
    event::{ self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind },
    terminal::{ disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen },
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{ Alignment, Rect },
    style::{ Color, Modifier, Style },
    text::Line,
    widgets::{ Block, BorderType, Borders, Paragraph },
    Frame, Terminal, TerminalOptions, Viewport,
};
use tracing_subscriber::EnvFilter;

use cli::Args;
use input::KeyAction;

use mira_core::{
    Catalog, Config, ConfiguredProbe, Controller, Mpc, PanelEvent, StateStore,
};


type PanelController = Controller<Mpc, ConfiguredProbe>;

/// Longest wait for input before timers are checked again.
const MAX_POLL: Duration = Duration::from_millis( 100 );


/// Application state.
struct App {
    controller: PanelController,
    config: Config,
    should_quit: bool,

    // Hit areas from the last draw, paired with what they select
    preset_cells: Vec<( Rect, usize )>,
    page_cells: Vec<( Rect, usize )>,
}


impl App {
    fn new( controller: PanelController, config: Config ) -> Self {
        Self {
            controller,
            config,
            should_quit: false,
            preset_cells: Vec::new(),
            page_cells: Vec::new(),
        }
    }


    /// Runs due timers.
    fn tick( &mut self ) {
        self.controller.tick( Instant::now() );
    }


    /// Handles a key event.
    fn handle_key( &mut self, code: KeyCode ) {
        let panel = self.controller.panel();
        let action = input::map_key(
            code,
            panel.grid(),
            panel.displayed_page(),
            panel.pages().len(),
        );

        match action {
            Some( KeyAction::Quit ) => self.should_quit = true,
            Some( KeyAction::Panel( event ) ) => self.dispatch( event ),
            None => {}
        }
    }


    /// Handles mouse events. A touch arrives as a left button press.
    fn handle_mouse( &mut self, column: u16, row: u16, kind: MouseEventKind ) {
        if kind != MouseEventKind::Down( MouseButton::Left ) {
            return;
        }

        let event = hit( &self.preset_cells, column, row )
            .map( PanelEvent::PresetSelected )
            .or_else( || hit( &self.page_cells, column, row ).map( PanelEvent::PageSelected ) );

        if let Some( event ) = event {
            self.dispatch( event );
        }
    }


    fn dispatch( &mut self, event: PanelEvent ) {
        tracing::debug!( "Panel event: {:?}", event );
        self.controller.handle( event, Instant::now() );
    }
}


/// Returns the target of the cell under the point.
fn hit( cells: &[( Rect, usize )], column: u16, row: u16 ) -> Option<usize> {
    let rects: Vec<Rect> = cells.iter().map( |( rect, _ )| *rect ).collect();
    layout::hit_test( &rects, column, row ).map( |i| cells[ i ].1 )
}


/// Parses a configured color name or `#rrggbb` value.
fn color( name: &str ) -> Color {
    let normalized = name.trim().to_lowercase().replace( "grey", "gray" );
    Color::from_str( &normalized ).unwrap_or( Color::Reset )
}


fn init_logging( config: &Config ) -> Result<()> {
    let log_path = &config.paths.log_file;
    if let Some( parent ) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all( parent )
                .with_context( || format!( "Failed to create log directory {}", parent.display() ) )?;
        }
    }

    let log_file = OpenOptions::new()
        .create( true )
        .append( true )
        .open( log_path )
        .with_context( || format!( "Failed to open log file {}", log_path.display() ) )?;

    // RUST_LOG wins over the configured level
    let level = if config.logging.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else( |_| EnvFilter::new( level ) );

    tracing_subscriber::fmt()
        .with_writer( Mutex::new( log_file ) )
        .with_env_filter( filter )
        .with_ansi( false )
        .init();

    Ok(())
}


fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration problems abort before anything is shown
    let config = settings::load()?;
    init_logging( &config )?;
    tracing::info!( "MIRa starting, {} station(s) configured", config.stations.len() );

    let catalog = Catalog::build( &config.stations, &config.buttons.defaults() );
    let controller = Controller::new(
        &config,
        catalog,
        StateStore::new( &config.paths.state_file ),
        Mpc::from_config( &config.player ),
        ConfiguredProbe::from_config( &config.link ),
    )?;

    let mut app = App::new( controller, config );
    app.controller.startup( Instant::now() );

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute( EnterAlternateScreen )?;
    io::stdout().execute( crossterm::event::EnableMouseCapture )?;

    let backend = CrosstermBackend::new( io::stdout() );
    let terminal = if args.fullscreen {
        Terminal::new( backend )
    } else {
        let ( width, height ) = crossterm::terminal::size()?;
        let area = Rect::new(
            0,
            0,
            app.config.display.width.min( width ),
            app.config.display.height.min( height ),
        );
        Terminal::with_options( backend, TerminalOptions { viewport: Viewport::Fixed( area ) } )
    };

    let result = match terminal {
        Ok( mut terminal ) => run( &mut terminal, &mut app ),
        Err( e ) => Err( e.into() ),
    };

    // Cleanup
    io::stdout().execute( crossterm::event::DisableMouseCapture )?;
    disable_raw_mode()?;
    io::stdout().execute( LeaveAlternateScreen )?;

    match &result {
        Ok(()) => tracing::info!( "MIRa exiting" ),
        Err( e ) => tracing::error!( "MIRa stopped: {:#}", e ),
    }
    result
}


/// Main loop.
fn run( terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App ) -> Result<()> {
    loop {
        // Update state
        app.tick();

        // Draw UI
        terminal.draw( |frame| draw_ui( frame, app ) )?;

        // Handle events, waking early if a timer is due sooner
        let timeout = app.controller.next_deadline()
            .map( |due| due.saturating_duration_since( Instant::now() ) )
            .map_or( MAX_POLL, |wait| wait.min( MAX_POLL ) );
        if event::poll( timeout )? {
            match event::read()? {
                Event::Key( key ) if key.kind == KeyEventKind::Press => {
                    app.handle_key( key.code );
                }
                Event::Mouse( mouse ) => {
                    app.handle_mouse( mouse.column, mouse.row, mouse.kind );
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}


/// Draws the main UI.
fn draw_ui( frame: &mut Frame, app: &mut App ) {
    let show_pages = app.controller.panel().pages().len() > 1;
    let areas = layout::split( frame.area(), app.config.spacing.height, show_pages );

    draw_title_bar( frame, app, areas.title );
    draw_status( frame, app, areas.status );

    if let Some( spacing ) = areas.spacing {
        let band = Block::default().style( Style::default().bg( color( &app.config.spacing.background_color ) ) );
        frame.render_widget( band, spacing );
    }

    draw_grid( frame, app, areas.grid );

    app.page_cells.clear();
    if let Some( pages ) = areas.pages {
        draw_page_selector( frame, app, pages );
    }
}


fn draw_title_bar( frame: &mut Frame, app: &App, area: Rect ) {
    let title = &app.controller.panel().title;
    let style = Style::default().fg( Color::White ).bg( Color::Black );

    let left = Paragraph::new( format!( " {}", app.config.title.text ) )
        .style( style.add_modifier( Modifier::BOLD ) );
    frame.render_widget( left, area );

    let right = Paragraph::new( format!( "{}  {} ", title.signal_text(), title.clock ) )
        .alignment( Alignment::Right )
        .style( style );
    frame.render_widget( right, area );
}


fn draw_status( frame: &mut Frame, app: &App, area: Rect ) {
    let status = &app.controller.panel().status;
    let style = Style::default()
        .fg( color( &app.config.status.text_color ) )
        .bg( color( &app.config.status.background_color ) );

    let lines = vec![
        Line::from( status.line1.as_str() ).style( Style::default().add_modifier( Modifier::BOLD ) ),
        Line::from( status.line2.as_str() ),
    ];

    let paragraph = Paragraph::new( lines )
        .alignment( Alignment::Center )
        .style( style );
    frame.render_widget( paragraph, area );
}


fn draw_grid( frame: &mut Frame, app: &mut App, area: Rect ) {
    let columns = app.config.buttons.columns;
    let cells = layout::grid_cells( area, columns, app.config.buttons.rows );

    app.preset_cells.clear();
    for slot in app.controller.panel().grid() {
        let Some( cell ) = cells.get( layout::cell_index( slot.column, slot.row, columns ) ).copied() else {
            continue;
        };

        let mut style = Style::default()
            .fg( color( &slot.text_color ) )
            .bg( color( &slot.background_color ) );
        let border = if slot.pressed {
            style = style.add_modifier( Modifier::REVERSED | Modifier::BOLD );
            BorderType::Thick
        } else {
            BorderType::Rounded
        };

        let button = Paragraph::new( vertically_centered( &slot.name, cell ) )
            .alignment( Alignment::Center )
            .style( style )
            .block( Block::default().borders( Borders::ALL ).border_type( border ) );
        frame.render_widget( button, cell );

        app.preset_cells.push(( cell, slot.number ));
    }
}


fn draw_page_selector( frame: &mut Frame, app: &mut App, area: Rect ) {
    let pages = app.controller.panel().pages();
    let cells = layout::page_cells( area, pages.len() );
    let base = Style::default()
        .fg( color( &app.config.page_selector.text_color ) )
        .bg( color( &app.config.page_selector.background_color ) );

    for ( page, cell ) in pages.iter().zip( cells ) {
        let ( style, border ) = if page.pressed {
            ( base.add_modifier( Modifier::REVERSED | Modifier::BOLD ), BorderType::Thick )
        } else {
            ( base, BorderType::Rounded )
        };

        let button = Paragraph::new( page.label.as_str() )
            .alignment( Alignment::Center )
            .style( style )
            .block( Block::default().borders( Borders::ALL ).border_type( border ) );
        frame.render_widget( button, cell );

        app.page_cells.push(( cell, page.index ));
    }
}


/// Pads `text` with blank lines so it sits in the middle of a bordered cell.
fn vertically_centered( text: &str, cell: Rect ) -> Vec<Line<'_>> {
    let inner_height = cell.height.saturating_sub( 2 ) as usize;
    let padding = inner_height.saturating_sub( 1 ) / 2;

    let mut lines = vec![ Line::from( "" ); padding ];
    lines.push( Line::from( text ) );
    lines
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_color_names() {
        assert_eq!( color( "red" ), Color::Red );
        assert_eq!( color( "Grey" ), Color::Gray );
        assert_eq!( color( "#ff8000" ), Color::Rgb( 255, 128, 0 ) );
        assert_eq!( color( "not-a-color" ), Color::Reset );
    }


    #[test]
    fn test_hit_maps_to_target() {
        let cells = vec![
            ( Rect::new( 0, 0, 10, 3 ), 4 ),
            ( Rect::new( 10, 0, 10, 3 ), 5 ),
        ];
        assert_eq!( hit( &cells, 12, 1 ), Some( 5 ) );
        assert_eq!( hit( &cells, 25, 1 ), None );
    }


    #[test]
    fn test_vertically_centered() {
        let lines = vertically_centered( "Radio", Rect::new( 0, 0, 20, 7 ) );
        assert_eq!( lines.len(), 3 );
        assert_eq!( lines[ 2 ], Line::from( "Radio" ) );
    }
}
