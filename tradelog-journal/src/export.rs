//! Ledger export (CSV/JSON).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tradelog_core::domain::{OpenState, Outcome, Side, TradeRecord};

pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create trades CSV {}", path.display()))?;

    writeln!(
        file,
        "id,date_opened,date_closed,symbol,side,open_state,outcome,entry_price,exit_price,size,return_amount"
    )?;

    for trade in trades {
        let side = match trade.side {
            Side::Long => "Long",
            Side::Short => "Short",
        };
        let open_state = match trade.open_state {
            OpenState::Open => "Open",
            OpenState::Closed => "Closed",
        };
        let outcome = match trade.outcome {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::NotApplicable => "N/A",
        };
        let date_closed = trade
            .date_closed
            .map(|d| d.to_string())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{},{},{},{},{},{:.4},{:.4},{},{:.2}",
            trade.id,
            trade.date_opened,
            date_closed,
            trade.symbol,
            side,
            open_state,
            outcome,
            trade.entry_price,
            trade.exit_price,
            trade.size,
            trade.return_amount
        )?;
    }

    Ok(())
}

pub fn write_trades_json(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(trades).context("Failed to serialize trades")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write trades JSON {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade() -> TradeRecord {
        TradeRecord {
            id: 9,
            open_state: OpenState::Closed,
            outcome: Outcome::Loss,
            date_opened: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            date_closed: Some(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap()),
            symbol: "TLT".into(),
            entry_price: 95.5,
            exit_price: 94.25,
            size: 40,
            side: Side::Long,
            return_amount: -50.0,
            principle_refs: Vec::new(),
            asset_refs: Vec::new(),
        }
    }

    #[test]
    fn csv_has_header_and_row() {
        let dir = std::env::temp_dir().join("tradelog_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trades.csv");

        write_trades_csv(&path, &[trade()]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("id,date_opened"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("9,2024-05-06,2024-05-09,TLT,Long,Closed,Loss"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_roundtrips() {
        let dir = std::env::temp_dir().join("tradelog_export_json_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trades.json");

        write_trades_json(&path, &[trade()]).unwrap();
        let loaded: Vec<TradeRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, vec![trade()]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
