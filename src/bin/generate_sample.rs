use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const HEADER: [&str; 10] = [
    "Country",
    "Region",
    "Year",
    "Happiness Score",
    "Economy (GDP per Capita)",
    "Family",
    "Health (Life Expectancy)",
    "Freedom",
    "Trust (Government Corruption)",
    "Generosity",
];

/// (country, region, happiness baseline)
const COUNTRIES: [(&str, &str, f64); 18] = [
    ("Denmark", "Western Europe", 7.5),
    ("France", "Western Europe", 6.5),
    ("Germany", "Western Europe", 6.9),
    ("Spain", "Western Europe", 6.4),
    ("Poland", "Central and Eastern Europe", 5.9),
    ("Romania", "Central and Eastern Europe", 5.8),
    ("Canada", "North America", 7.3),
    ("United States", "North America", 7.0),
    ("Brazil", "Latin America and Caribbean", 6.6),
    ("Mexico", "Latin America and Caribbean", 6.6),
    ("Japan", "Eastern Asia", 5.9),
    ("South Korea", "Eastern Asia", 5.8),
    ("India", "Southern Asia", 4.3),
    ("Thailand", "Southeastern Asia", 6.4),
    ("Egypt", "Middle East and Northern Africa", 4.4),
    ("Kenya", "Sub-Saharan Africa", 4.5),
    ("Australia", "Australia and New Zealand", 7.3),
    ("New Zealand", "Australia and New Zealand", 7.3),
];

const YEARS: [&str; 3] = ["2015", "2016", "2017"];

/// Indicator baselines scaled from the happiness score, clamped to [lo, hi].
fn indicator(rng: &mut SimpleRng, happiness: f64, weight: f64, lo: f64, hi: f64) -> f64 {
    rng.gauss(happiness / 10.0 * weight, 0.05 * weight).clamp(lo, hi)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "happiness_fixed.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for year in YEARS {
        for &(country, region, base) in &COUNTRIES {
            let happiness = rng.gauss(base, 0.15).clamp(0.0, 10.0);
            let values = [
                happiness,
                indicator(&mut rng, happiness, 2.0, 0.0, 2.0),
                indicator(&mut rng, happiness, 1.8, 0.0, 2.0),
                indicator(&mut rng, happiness, 1.2, 0.0, 1.0),
                indicator(&mut rng, happiness, 0.8, 0.0, 1.0),
                indicator(&mut rng, happiness, 0.4, 0.0, 1.0),
                indicator(&mut rng, happiness, 0.4, 0.0, 1.0),
            ];

            let mut record = vec![country.to_string(), region.to_string(), year.to_string()];
            record.extend(values.iter().map(|v| format!("{v:.5}")));
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {rows} rows ({} countries × {} years) to {output_path}",
        COUNTRIES.len(),
        YEARS.len()
    );
    Ok(())
}
