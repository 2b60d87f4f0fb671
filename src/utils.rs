use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

/// `$1,234,567.89`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, group_thousands(whole), frac)
}

/// `$1.23B`, `$45.60M`, `$7.10K`, or the plain amount below a thousand.
pub fn format_compact(amount: Decimal) -> String {
    let scales = [
        (dec!(1_000_000_000), "B"),
        (dec!(1_000_000), "M"),
        (dec!(1_000), "K"),
    ];
    for (scale, suffix) in scales {
        if amount.abs() >= scale {
            return format!("${:.2}{}", (amount / scale).round_dp(2), suffix);
        }
    }
    format!("${:.2}", amount.round_dp(2))
}

/// Growth percentage with one decimal, `n/a` when undefined.
pub fn format_pct(pct: Option<Decimal>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p.round_dp(1)),
        None => "n/a".to_string(),
    }
}

/// Mean/median style value, `no data` when undefined.
pub fn format_optional_money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "no data".to_string(), format_money)
}

pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
