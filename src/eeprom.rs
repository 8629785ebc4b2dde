use bubble_course::definitions::{Address, MAX_SCORE};
use bubble_course::hal::TwoWireBus;
use bubble_course::simulators::{BusError, SimulatedBoard, SimulatedEeprom};
use bubble_course::store::{self, StoreResult};
use bubble_course::util::parse_number;

use clap::{arg, command, value_parser, ArgMatches, Command};
use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process::exit;

fn parse_address(value: &str) -> Result<Address, String> {
    let number = parse_number(value)?;
    Address::try_from(number).map_err(|_| format!("address {:#x} is out of range", number))
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let number = parse_number(value)?;
    u8::try_from(number).map_err(|_| format!("{:#x} does not fit in a byte", number))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    ReadByte(Address),
    WriteByte(Address, u8),
    WriteStr(Address, String),
    ReadStr(Address),
    ReadBetween(Address, Address),
    Zero(Address, Address),
    ShowHighScore,
    SetHighScore(u8),
    ClearHighScore,
}

impl Action {
    fn from_matches(matches: &ArgMatches) -> Option<Self> {
        let address = |m: &ArgMatches, id: &str| *m.get_one::<Address>(id).unwrap();

        let action = match matches.subcommand()? {
            ("read-byte", m) => Action::ReadByte(address(m, "address")),
            ("write-byte", m) => {
                Action::WriteByte(address(m, "address"), *m.get_one::<u8>("value").unwrap())
            }
            ("write-str", m) => Action::WriteStr(
                address(m, "address"),
                m.get_one::<String>("text").unwrap().clone(),
            ),
            ("read-str", m) => Action::ReadStr(address(m, "address")),
            ("read-between", m) => Action::ReadBetween(address(m, "from"), address(m, "to")),
            ("zero", m) => Action::Zero(address(m, "from"), address(m, "to")),
            ("high-score", m) => {
                if let Some(score) = m.get_one::<u8>("set") {
                    Action::SetHighScore(*score)
                } else if m.get_flag("clear") {
                    Action::ClearHighScore
                } else {
                    Action::ShowHighScore
                }
            }
            _ => return None,
        };
        Some(action)
    }

    fn writes(&self) -> bool {
        matches!(
            self,
            Action::WriteByte(..)
                | Action::WriteStr(..)
                | Action::Zero(..)
                | Action::SetHighScore(_)
                | Action::ClearHighScore
        )
    }
}

fn hex_dump(from: Address, bytes: &[u8]) -> String {
    let mut lines = Vec::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let address = from as usize + i * 16;
        let hex = chunk
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("{:04x}: {}", address, hex));
    }
    lines.join("\n")
}

/// Runs one action with the bus enabled and returns what to print.
fn apply(board: &mut SimulatedBoard, action: &Action) -> StoreResult<String, BusError> {
    board.set_enabled(true);
    let result = execute(board, action);
    board.set_enabled(false);
    result
}

fn execute(board: &mut SimulatedBoard, action: &Action) -> StoreResult<String, BusError> {
    match action {
        Action::ReadByte(address) => {
            let value = store::read_byte(board, *address)?;
            Ok(format!("{:#06x}: {:#04x} ({})", address, value, value))
        }
        Action::WriteByte(address, value) => {
            store::write_byte(board, *address, *value)?;
            Ok(format!("wrote {:#04x} to {:#06x}", value, address))
        }
        Action::WriteStr(address, text) => {
            let end = store::write_string(board, *address, text.as_bytes())?;
            Ok(format!("wrote {:?} to {:#06x}..{:#06x}", text, address, end))
        }
        Action::ReadStr(address) => {
            let bytes = store::read_until_null(board, *address)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Action::ReadBetween(from, to) => {
            let bytes = store::read_between(board, *from, *to)?;
            Ok(hex_dump(*from, &bytes))
        }
        Action::Zero(from, to) => {
            store::zero_range(board, *from, *to)?;
            Ok(format!("zeroed {:#06x}..{:#06x}", from, to))
        }
        Action::ShowHighScore => match store::load_high_score(board)? {
            Some(score) => Ok(format!("high score: {}", score)),
            None => Ok(String::from("no high score recorded")),
        },
        Action::SetHighScore(score) => {
            store::save_high_score(board, *score)?;
            Ok(format!("high score set to {}", (*score).min(MAX_SCORE)))
        }
        Action::ClearHighScore => {
            store::clear_high_score(board)?;
            Ok(String::from("high score cleared"))
        }
    }
}

fn cli() -> Command {
    let address_arg = || {
        arg!(<ADDRESS> "EEPROM address, decimal or 0x prefixed hex")
            .id("address")
            .value_parser(parse_address)
    };
    let range_args = |cmd: Command| {
        cmd.arg(arg!(<FROM> "First address").id("from").value_parser(parse_address))
            .arg(arg!(<TO> "Address past the last one").id("to").value_parser(parse_address))
    };

    command!()
        .about("Inspect and edit the EEPROM image the handheld keeps its high score in")
        .arg(
            arg!(-i --image <IMAGE> "EEPROM image file")
                .value_parser(value_parser!(PathBuf))
                .default_value("bubble-course.eeprom"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("read-byte")
                .about("Print a single byte")
                .arg(address_arg()),
        )
        .subcommand(
            Command::new("write-byte")
                .about("Write a single byte")
                .arg(address_arg())
                .arg(arg!(<VALUE> "Byte to write").id("value").value_parser(parse_byte)),
        )
        .subcommand(
            Command::new("write-str")
                .about("Write a NUL terminated string")
                .arg(address_arg())
                .arg(arg!(<TEXT> "Text to write").id("text")),
        )
        .subcommand(
            Command::new("read-str")
                .about("Read up to a NUL byte or an erased cell")
                .arg(address_arg()),
        )
        .subcommand(range_args(
            Command::new("read-between").about("Hex dump a range of addresses"),
        ))
        .subcommand(range_args(
            Command::new("zero").about("Write 0 to a range of addresses"),
        ))
        .subcommand(
            Command::new("high-score")
                .about("Show, set or clear the stored high score")
                .arg(
                    arg!(--set <SCORE> "Store this score")
                        .value_parser(parse_byte)
                        .conflicts_with("clear"),
                )
                .arg(arg!(--clear "Erase the stored score")),
        )
}

fn main() {
    env_logger::init();

    let matches = cli().get_matches();
    let path = matches.get_one::<PathBuf>("image").unwrap().clone();

    let Some(action) = Action::from_matches(&matches) else {
        error!("unknown command");
        exit(2);
    };

    let eeprom = if path.exists() {
        let image = fs::read(&path).unwrap_or_else(|err| {
            error!("could not read '{}': {}", path.display(), err);
            exit(1);
        });
        SimulatedEeprom::from_image(&image).unwrap_or_else(|err| {
            error!("'{}': {}", path.display(), err);
            exit(1);
        })
    } else {
        info!("{} does not exist, starting with an erased EEPROM", path.display());
        SimulatedEeprom::new()
    };

    let mut board = SimulatedBoard::with_eeprom(eeprom);
    match apply(&mut board, &action) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    }

    if action.writes() {
        if let Err(err) = fs::write(&path, board.eeprom().image()) {
            error!("could not write '{}': {}", path.display(), err);
            exit(1);
        }
        info!("saved {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_course::definitions::HIGH_SCORE_ADDRESS;

    fn action(args: &[&str]) -> Action {
        let mut argv = vec!["eeprom"];
        argv.extend_from_slice(args);
        let matches = cli().try_get_matches_from(argv).unwrap();
        Action::from_matches(&matches).unwrap()
    }

    #[test]
    fn test_cli_parses_addresses_and_values() {
        assert_eq!(Action::ReadByte(0x1337), action(&["read-byte", "0x1337"]));
        assert_eq!(Action::WriteByte(16, 0xAB), action(&["write-byte", "16", "0xab"]));
        assert_eq!(
            Action::WriteStr(0x10, String::from("hi")),
            action(&["write-str", "0x10", "hi"])
        );
        assert_eq!(Action::Zero(0, 8), action(&["-i", "x.bin", "zero", "0", "8"]));
        assert_eq!(Action::SetHighScore(7), action(&["high-score", "--set", "7"]));
        assert_eq!(Action::ClearHighScore, action(&["high-score", "--clear"]));
        assert_eq!(Action::ShowHighScore, action(&["high-score"]));
    }

    #[test]
    fn test_cli_rejects_out_of_range_numbers() {
        assert!(cli()
            .try_get_matches_from(["eeprom", "read-byte", "0x10000"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["eeprom", "write-byte", "0", "256"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["eeprom", "high-score", "--set", "1", "--clear"])
            .is_err());
    }

    #[test]
    fn test_string_round_trip_through_the_bus() {
        let mut board = SimulatedBoard::new();
        let written = apply(&mut board, &Action::WriteStr(0x8000, String::from("bubble"))).unwrap();
        assert_eq!("wrote \"bubble\" to 0x8000..0x8007", written);
        assert_eq!("bubble", apply(&mut board, &Action::ReadStr(0x8000)).unwrap());
        assert!(!board.eeprom().is_enabled());
    }

    #[test]
    fn test_high_score_commands() {
        let mut board = SimulatedBoard::new();
        assert_eq!(
            "no high score recorded",
            apply(&mut board, &Action::ShowHighScore).unwrap()
        );

        apply(&mut board, &Action::SetHighScore(42)).unwrap();
        assert_eq!(42, board.eeprom().peek(HIGH_SCORE_ADDRESS));
        assert_eq!("high score: 42", apply(&mut board, &Action::ShowHighScore).unwrap());

        assert_eq!(
            "high score set to 254",
            apply(&mut board, &Action::SetHighScore(255)).unwrap()
        );
        assert_eq!("high score: 254", apply(&mut board, &Action::ShowHighScore).unwrap());

        apply(&mut board, &Action::ClearHighScore).unwrap();
        assert_eq!(0xFF, board.eeprom().peek(HIGH_SCORE_ADDRESS));
    }

    #[test]
    fn test_zero_then_dump() {
        let mut board = SimulatedBoard::new();
        apply(&mut board, &Action::Zero(0x20, 0x24)).unwrap();
        let dump = apply(&mut board, &Action::ReadBetween(0x1e, 0x26)).unwrap();
        assert_eq!("001e: ff ff 00 00 00 00 ff ff", dump);
    }

    #[test]
    fn test_stuck_bus_reports_the_address() {
        let mut board = SimulatedBoard::new();
        board.eeprom_mut().set_stuck(true);
        let err = apply(&mut board, &Action::ReadByte(0x42)).unwrap_err();
        assert_eq!(0x42, err.address);
        assert!(!board.eeprom().is_enabled());
    }

    #[test]
    fn test_only_writing_actions_save() {
        assert!(Action::Zero(0, 1).writes());
        assert!(Action::SetHighScore(1).writes());
        assert!(!Action::ReadStr(0).writes());
        assert!(!Action::ShowHighScore.writes());
    }
}
