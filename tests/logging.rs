#![allow(clippy::pedantic)]
mod common;

use csvrow::logger::{set_log_file, set_log_prefix};
use csvrow::{Decoder, DecoderOptions};

use common::Person;

#[test]
fn unmatched_bindings_are_logged_only_when_enabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("logs/decode.log");
    set_log_file(&log_path).expect("configure log file");

    let data = "First Name,Email,Email\nJohn,a@example.com,b@example.com\n";

    let mut quiet = Decoder::<Person, _>::from_reader(data.as_bytes());
    quiet.read().expect("quiet read").expect("quiet row");
    assert_eq!(std::fs::read_to_string(&log_path).expect("read log"), "");

    let options = DecoderOptions::new().with_warn_unmatched(true);
    let _prefix = set_log_prefix("people.csv");
    let mut noisy = Decoder::<Person, _>::from_reader_with(data.as_bytes(), &options);
    let row = noisy.read().expect("noisy read").expect("noisy row");
    assert_eq!(row.email, "b@example.com");

    let log = std::fs::read_to_string(&log_path).expect("read log");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(
        lines,
        vec![
            "warning: people.csv: header column 'Email' appears at positions 1 and 2; using 2",
            "warning: people.csv: field 'last_name' binds to column 'Last Name' which is not in the header",
            "warning: people.csv: field 'city' binds to column 'City' which is not in the header",
            "warning: people.csv: field 'state' binds to column 'State' which is not in the header",
        ]
    );
}
