//! Synthetic workbook for demos and tests.
//!
//! Output is a function of the options alone: the same seed always yields
//! the same sheets.

use crate::utils::write_csv;
use anyhow::{ensure, Context};
use rand::{seq::index, Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

const SURNAMES: [&str; 12] = [
    "GARCIA RODRIGUEZ",
    "MARTINEZ LOPEZ",
    "RODRIGUEZ GARCIA",
    "LOPEZ MARTINEZ",
    "GONZALEZ PEREZ",
    "PEREZ GONZALEZ",
    "SANCHEZ RODRIGUEZ",
    "RAMIREZ LOPEZ",
    "TORRES GARCIA",
    "FLORES MARTINEZ",
    "RIVERA LOPEZ",
    "GOMEZ PEREZ",
];

const FIRST_NAMES: [&str; 12] = [
    "JUAN", "MARIA", "CARLOS", "ANA", "LUIS", "LAURA", "PEDRO", "SOFIA", "DIEGO", "VALENTINA",
    "MIGUEL", "CAMILA",
];

struct SegmentProfile {
    segment: &'static str,
    desk: &'static str,
    tier: &'static str,
    aum_range: (f64, f64),
}

const SEGMENTS: [SegmentProfile; 5] = [
    SegmentProfile {
        segment: "1. PRIVATE BANKING",
        desk: "PRIVATE BANKING",
        tier: "DIAMOND INVESTOR",
        aum_range: (50_000_000.0, 500_000_000.0),
    },
    SegmentProfile {
        segment: "2. PREFERRED BANKING",
        desk: "PREFERRED BANKING",
        tier: "PLATINUM INVESTOR",
        aum_range: (20_000_000.0, 100_000_000.0),
    },
    SegmentProfile {
        segment: "3. SILVER INVESTORS",
        desk: "SILVER INVESTORS",
        tier: "GOLD INVESTOR",
        aum_range: (10_000_000.0, 50_000_000.0),
    },
    SegmentProfile {
        segment: "4. GOLD INVESTORS",
        desk: "GOLD INVESTORS",
        tier: "SILVER INVESTOR",
        aum_range: (5_000_000.0, 30_000_000.0),
    },
    SegmentProfile {
        segment: "5. CORPORATE BANKING",
        desk: "CORPORATE BANKING",
        tier: "BRONZE INVESTOR",
        aum_range: (30_000_000.0, 200_000_000.0),
    },
];

/// Share of the client base reporting in any given month.
const MONTHLY_COVERAGE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoOptions {
    pub clients: usize,
    pub advisors: usize,
    pub first_year: i16,
    pub last_year: i16,
    pub seed: u64,
}

impl Default for DemoOptions {
    fn default() -> Self {
        DemoOptions {
            clients: 1000,
            advisors: 50,
            first_year: 2017,
            last_year: 2022,
            seed: 42,
        }
    }
}

/// A generated sheet row. `tier` and `secondary_aum` are extra columns the
/// loader ignores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoRow {
    pub year: i16,
    pub month: u8,
    pub segment: &'static str,
    pub desk: &'static str,
    pub advisor_id: String,
    pub advisor_name: String,
    pub client_id: String,
    pub client_name: String,
    pub aum_value: Decimal,
    pub client_flag: u8,
    pub tier: &'static str,
    pub secondary_aum: Decimal,
}

struct Person {
    id: String,
    name: String,
}

fn people(rng: &mut Pcg64Mcg, count: usize, first_id: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person {
            id: (first_id + i).to_string(),
            name: format!(
                "{} {}",
                FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                SURNAMES[rng.gen_range(0..SURNAMES.len())]
            ),
        })
        .collect()
}

fn cents(amount: f64) -> Decimal {
    Decimal::new((amount * 100.0).round() as i64, 2)
}

/// One sheet per year, named `Base <year>`, in ascending year order.
pub fn generate(options: &DemoOptions) -> anyhow::Result<Vec<(String, Vec<DemoRow>)>> {
    ensure!(options.advisors > 0, "at least one advisor is required");
    ensure!(
        options.first_year <= options.last_year,
        "first year {} is after last year {}",
        options.first_year,
        options.last_year
    );

    let mut rng = Pcg64Mcg::seed_from_u64(options.seed);
    let clients = people(&mut rng, options.clients, 100_000);
    let advisors = people(&mut rng, options.advisors, 19_000_000);
    let per_month = (options.clients as f64 * MONTHLY_COVERAGE) as usize;

    let mut sheets = Vec::new();
    for year in options.first_year..=options.last_year {
        let mut rows = Vec::new();
        for month in 1..=12u8 {
            let mut picked = index::sample(&mut rng, clients.len(), per_month).into_vec();
            picked.sort_unstable();

            for client in picked.into_iter().map(|i| &clients[i]) {
                let advisor = &advisors[rng.gen_range(0..advisors.len())];
                let profile = &SEGMENTS[rng.gen_range(0..SEGMENTS.len())];

                let (low, high) = profile.aum_range;
                let growth = 1.0 + f64::from(year - 2017) * 0.05 + f64::from(month) * 0.001;
                let aum = rng.gen_range(low..high) * growth * rng.gen_range(0.9..1.1);

                rows.push(DemoRow {
                    year,
                    month,
                    segment: profile.segment,
                    desk: profile.desk,
                    advisor_id: advisor.id.clone(),
                    advisor_name: advisor.name.clone(),
                    client_id: client.id.clone(),
                    client_name: client.name.clone(),
                    aum_value: cents(aum),
                    client_flag: u8::from(rng.gen::<f64>() > 0.5),
                    tier: profile.tier,
                    secondary_aum: cents(aum * rng.gen_range(0.1..0.3)),
                });
            }
        }
        sheets.push((format!("Base {year}"), rows));
    }
    Ok(sheets)
}

/// Writes `<dir>/Base <year>.csv` for each generated sheet and returns the
/// sheet names with their row counts.
pub fn write_workbook(options: &DemoOptions, dir: &Path) -> anyhow::Result<Vec<(String, usize)>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for (sheet, rows) in generate(options)? {
        let path = dir.join(format!("{sheet}.csv"));
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&rows, file)?;
        log::info!("Sheet '{}' written ({} rows)", sheet, rows.len());
        written.push((sheet, rows.len()));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{load, WorkbookDir};

    fn small() -> DemoOptions {
        DemoOptions {
            clients: 20,
            advisors: 3,
            first_year: 2020,
            last_year: 2021,
            seed: 7,
        }
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate(&small()).unwrap(), generate(&small()).unwrap());

        let other = DemoOptions { seed: 8, ..small() };
        assert_ne!(generate(&small()).unwrap(), generate(&other).unwrap());
    }

    #[test]
    fn sheets_follow_the_profile() {
        let sheets = generate(&small()).unwrap();
        let names: Vec<_> = sheets.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Base 2020", "Base 2021"]);

        for (_, rows) in &sheets {
            // 70% of 20 clients, every month
            assert_eq!(rows.len(), 14 * 12);
            for row in rows {
                assert!(row.client_flag <= 1);
                assert!(row.aum_value > Decimal::ZERO);
                assert!(row.secondary_aum < row.aum_value);
                assert_eq!(row.aum_value.scale(), 2);
            }
        }
    }

    #[test]
    fn rejects_empty_advisor_pool() {
        let options = DemoOptions { advisors: 0, ..small() };
        assert!(generate(&options).is_err());
    }

    #[test]
    fn written_workbook_loads() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_workbook(&small(), dir.path()).unwrap();
        let sheets: Vec<String> = written.iter().map(|(name, _)| name.clone()).collect();

        let table = load(&WorkbookDir::new(dir.path(), sheets)).unwrap();
        assert_eq!(table.len(), 2 * 14 * 12);
        assert_eq!(table.years(), vec![2020, 2021]);
        assert_eq!(table.months(), (1..=12).collect::<Vec<u8>>());
    }
}
