use bubble_course::config::Settings;
use bubble_course::console::Console;
use bubble_course::hal::Board;
use bubble_course::simulators::{SimulatedBoard, SimulatedEeprom};
use bubble_course::util::parse_number;

use clap::{arg, command, value_parser, ArgAction};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

fn parse_contrast(value: &str) -> Result<u8, String> {
    let vop = parse_number(value)?;
    if vop > 0x7f {
        return Err(format!("contrast must be at most 0x7f, got {:#x}", vop));
    }
    Ok(vop as u8)
}

fn load_eeprom(path: Option<&PathBuf>) -> SimulatedEeprom {
    let Some(path) = path else {
        return SimulatedEeprom::new();
    };
    if !path.exists() {
        info!("{} does not exist yet, starting with an erased EEPROM", path.display());
        return SimulatedEeprom::new();
    }

    let image = match fs::read(path) {
        Ok(image) => image,
        Err(err) => {
            error!("could not read '{}': {}", path.display(), err);
            exit(1);
        }
    };
    match SimulatedEeprom::from_image(&image) {
        Ok(eeprom) => eeprom,
        Err(err) => {
            error!("'{}': {}", path.display(), err);
            exit(1);
        }
    }
}

fn save_eeprom(path: Option<&Path>, eeprom: &SimulatedEeprom) {
    if let Some(path) = path {
        if let Err(err) = fs::write(path, eeprom.image()) {
            error!("could not write '{}': {}", path.display(), err);
            exit(1);
        }
        info!("EEPROM saved to {}", path.display());
    }
}

fn play<B: Board>(board: B, settings: Settings, sessions: Option<u32>) -> Console<B> {
    let mut console = match Console::boot(board, settings) {
        Ok(console) => console,
        Err(err) => {
            error!("boot failed: {}", err);
            exit(1);
        }
    };

    match console.run(sessions) {
        Ok(outcomes) => {
            for (i, outcome) in outcomes.iter().enumerate() {
                let record = if outcome.new_high_score { " (new high score)" } else { "" };
                println!("session {}: score {}{}", i + 1, outcome.score, record);
            }
        }
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    }

    console
}

#[cfg(feature = "desktop")]
mod desktop {
    use super::save_eeprom;
    use bubble_course::definitions::{LCD_HEIGHT, LCD_WIDTH};
    use bubble_course::hal::{Controls, DelayNs, DisplayBus, ErrorType, InputPin, Line, TwoWireBus};
    use bubble_course::keyboard::is_button_key;
    use bubble_course::simulators::{BusError, SimulatedBoard, SimulatedLine};
    use std::convert::Infallible;

    use sdl2::event::Event;
    use sdl2::pixels::Color;
    use sdl2::rect::Point;
    use sdl2::render::Canvas;
    use sdl2::video::Window;
    use sdl2::EventPump;
    use std::path::PathBuf;
    use std::thread::sleep;
    use std::time::Duration;

    /// The button as a keyboard key. Held keys read low, like the real switch.
    #[derive(Default)]
    pub struct KeyButton {
        down: bool,
    }

    impl ErrorType for KeyButton {
        type Error = Infallible;
    }

    impl InputPin for KeyButton {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.down)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.down)
        }
    }

    /// The simulated board, shown in an SDL window and driven by the keyboard.
    pub struct DesktopBoard {
        board: SimulatedBoard,
        canvas: Canvas<Window>,
        event_pump: EventPump,
        key: KeyButton,
        shown: Option<(u64, bool)>,
        eeprom_path: Option<PathBuf>,
    }

    impl DesktopBoard {
        pub fn new(board: SimulatedBoard, scale: u32, eeprom_path: Option<PathBuf>) -> Self {
            let logical_width = LCD_WIDTH as u32;
            let logical_height = LCD_HEIGHT as u32;

            let sdl_context = sdl2::init().unwrap();
            let video_subsystem = sdl_context.video().unwrap();

            let window = video_subsystem
                .window(
                    "Bubble Course",
                    logical_width * scale,
                    logical_height * scale,
                )
                .position_centered()
                .resizable()
                .build()
                .unwrap();

            let mut canvas = window.into_canvas().build().unwrap();

            // only scale by integers instead of fractions to keep everything crisp
            canvas.set_integer_scale(true).unwrap();
            canvas
                .set_logical_size(logical_width, logical_height)
                .unwrap();

            let event_pump = sdl_context.event_pump().unwrap();

            Self {
                board,
                canvas,
                event_pump,
                key: KeyButton::default(),
                shown: None,
                eeprom_path,
            }
        }

        fn pump_events(&mut self) {
            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => {
                        save_eeprom(self.eeprom_path.as_deref(), self.board.eeprom());
                        std::process::exit(0);
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } if is_button_key(&keycode.name()) => self.key.down = true,
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } if is_button_key(&keycode.name()) => self.key.down = false,
                    _ => {}
                }
            }
        }

        fn present(&mut self) {
            let lcd = self.board.lcd();
            let backlight = self.board.backlight_on();
            let state = (lcd.frames(), backlight);
            if self.shown == Some(state) {
                return;
            }

            let background = if backlight {
                Color::RGB(199, 240, 216)
            } else {
                Color::RGB(120, 140, 128)
            };

            let mut points = Vec::new();
            for y in 0..LCD_HEIGHT {
                for x in 0..LCD_WIDTH {
                    if lcd.pixel(x, y) {
                        points.push(Point::new(x as i32, y as i32));
                    }
                }
            }

            self.canvas.set_draw_color(background);
            self.canvas.clear();
            self.canvas.set_draw_color(Color::RGB(34, 35, 35));
            self.canvas.draw_points(points.as_slice()).unwrap();
            self.canvas.present();
            self.shown = Some(state);
        }

        pub fn into_inner(self) -> SimulatedBoard {
            self.board
        }
    }

    impl DelayNs for DesktopBoard {
        fn delay_ns(&mut self, ns: u32) {
            self.board.delay_ns(ns);
            sleep(Duration::from_nanos(u64::from(ns)));
        }

        fn delay_us(&mut self, us: u32) {
            self.board.delay_us(us);
            sleep(Duration::from_micros(u64::from(us)));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.pump_events();
            self.present();
            self.board.delay_ms(ms);
            sleep(Duration::from_millis(u64::from(ms)));
        }
    }

    impl Controls for DesktopBoard {
        type Button = KeyButton;

        fn button(&mut self) -> &mut KeyButton {
            self.pump_events();
            &mut self.key
        }
    }

    impl DisplayBus for DesktopBoard {
        type Pin = SimulatedLine;

        fn pin(&mut self, line: Line) -> &mut SimulatedLine {
            self.board.pin(line)
        }

        fn transfer(&mut self, byte: u8) {
            self.board.transfer(byte);
        }
    }

    impl TwoWireBus for DesktopBoard {
        type Error = BusError;

        fn set_enabled(&mut self, enabled: bool) {
            self.board.set_enabled(enabled);
        }

        fn start(&mut self) -> Result<(), BusError> {
            self.board.start()
        }

        fn restart(&mut self) -> Result<(), BusError> {
            self.board.restart()
        }

        fn stop(&mut self) -> Result<(), BusError> {
            self.board.stop()
        }

        fn put(&mut self, byte: u8) -> Result<(), BusError> {
            self.board.put(byte)
        }

        fn get(&mut self, nack: bool) -> Result<u8, BusError> {
            self.board.get(nack)
        }
    }
}

#[cfg(feature = "desktop")]
fn run(
    board: SimulatedBoard,
    settings: Settings,
    sessions: Option<u32>,
    scale: u32,
    _flap_ms: u64,
    eeprom_path: Option<PathBuf>,
) {
    let board = desktop::DesktopBoard::new(board, scale, eeprom_path.clone());
    let console = play(board, settings, sessions);
    let board = console.into_board().into_inner();
    save_eeprom(eeprom_path.as_deref(), board.eeprom());
}

#[cfg(not(feature = "desktop"))]
fn run(
    mut board: SimulatedBoard,
    settings: Settings,
    sessions: Option<u32>,
    _scale: u32,
    flap_ms: u64,
    eeprom_path: Option<PathBuf>,
) {
    println!("You are running in headless mode!");
    println!("The button is pressed automatically every {}ms.", flap_ms);
    println!("If you want to play yourself,");
    println!("you will need to compile the application with the desktop feature enabled");

    board.press_periodically(flap_ms, u64::from(settings.tick_ms));
    // an endless headless run would never print anything
    let console = play(board, settings, Some(sessions.unwrap_or(1)));

    let board = console.into_board();
    println!("{:?}", board.lcd());
    save_eeprom(eeprom_path.as_deref(), board.eeprom());
}

fn main() {
    env_logger::init();

    let tick_arg = arg!(--"tick-ms" <MS> "Frame time of the game loop")
        .value_parser(value_parser!(u32))
        .default_value("80");

    let seed_arg = arg!(--seed <SEED> "Seed for the wall openings")
        .value_parser(value_parser!(u64))
        .default_value("20");

    let contrast_arg = arg!(--contrast <VOP> "LCD operating voltage, 0 to 0x7f")
        .value_parser(parse_contrast)
        .default_value("0x42");

    let skip_intro_arg =
        arg!(--"skip-intro" "Skip the intro animation and title screens").action(ArgAction::SetTrue);

    let scale_arg = arg!(--scale <N> "Window scale factor")
        .value_parser(value_parser!(u32))
        .default_value("6");

    let eeprom_arg = arg!(--eeprom <IMAGE> "EEPROM image file the high score is kept in")
        .value_parser(value_parser!(PathBuf));

    let sessions_arg = arg!(--sessions <N> "Stop after this many games")
        .value_parser(value_parser!(u32));

    let flap_arg = arg!(--"flap-ms" <MS> "Headless only: press the button this often")
        .value_parser(value_parser!(u64))
        .default_value("400");

    let matches = command!()
        .arg(tick_arg)
        .arg(seed_arg)
        .arg(contrast_arg)
        .arg(skip_intro_arg)
        .arg(scale_arg)
        .arg(eeprom_arg)
        .arg(sessions_arg)
        .arg(flap_arg)
        .get_matches();

    let settings = Settings {
        tick_ms: *matches.get_one::<u32>("tick-ms").unwrap(),
        seed: *matches.get_one::<u64>("seed").unwrap(),
        contrast: *matches.get_one::<u8>("contrast").unwrap(),
        intro: !*matches.get_one::<bool>("skip-intro").unwrap(),
        ..Settings::default()
    };
    let scale = *matches.get_one::<u32>("scale").unwrap();
    let flap_ms = *matches.get_one::<u64>("flap-ms").unwrap();
    let sessions = matches.get_one::<u32>("sessions").copied();
    let eeprom_path = matches.get_one::<PathBuf>("eeprom").cloned();

    let eeprom = load_eeprom(eeprom_path.as_ref());
    let board = SimulatedBoard::with_eeprom(eeprom);

    run(board, settings, sessions, scale, flap_ms, eeprom_path);
}
