use folio_parser::{parse_ledger, read_json, LedgerOptions};

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let filename = std::env::args().nth(1).ok_or("filename argument")?;
    let unparsed_file = std::fs::read_to_string(filename)?;

    let document = read_json(&unparsed_file)?;
    let ledger = parse_ledger(&document, &LedgerOptions::default())?;
    dbg!(ledger);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        println!("Error: {}", e);
    }
}
