use serde::Serialize;

/// One output row, in the column layout the dashboard reads.
#[derive(Serialize)]
struct SalaryRow {
    ano: i32,
    senioridade: &'static str,
    contrato: &'static str,
    cargo: &'static str,
    salario: f64,
    moeda: &'static str,
    usd: f64,
    residencia: &'static str,
    remoto: &'static str,
    empresa: &'static str,
    tamanho_empresa: &'static str,
    residencia_iso3: &'static str,
}

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (title, base salary in USD)
const ROLES: [(&str, f64); 8] = [
    ("Data Scientist", 120_000.0),
    ("Data Engineer", 125_000.0),
    ("Data Analyst", 85_000.0),
    ("Machine Learning Engineer", 140_000.0),
    ("Analytics Engineer", 115_000.0),
    ("Research Scientist", 150_000.0),
    ("BI Analyst", 75_000.0),
    ("Data Architect", 145_000.0),
];

/// (residence code, ISO3, currency, USD per unit, salary scale)
const COUNTRIES: [(&str, &str, &str, f64, f64); 6] = [
    ("US", "USA", "USD", 1.0, 1.0),
    ("BR", "BRA", "BRL", 0.2, 0.35),
    ("GB", "GBR", "GBP", 1.27, 0.75),
    ("DE", "DEU", "EUR", 1.08, 0.7),
    ("IN", "IND", "INR", 0.012, 0.25),
    ("CA", "CAN", "CAD", 0.74, 0.8),
];

const SENIORITY: [(&str, f64); 4] = [
    ("junior", 0.6),
    ("pleno", 0.85),
    ("senior", 1.1),
    ("executivo", 1.5),
];

const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const REMOTE: [&str; 3] = ["presencial", "remoto", "hibrido"];
const SIZES: [&str; 3] = ["pequena", "media", "grande"];

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // Same name as the dashboard's default `--data`.
    let output_path = "dados-imersao-final.csv";
    let mut writer = csv::Writer::from_path(output_path)?;

    let mut rows = 0usize;
    for year in 2020..=2025 {
        for _ in 0..400 {
            let &(cargo, base) = rng.pick(&ROLES);
            let &(senioridade, level) = rng.pick(&SENIORITY);
            let &(residencia, iso3, moeda, fx, scale) = rng.pick(&COUNTRIES);

            let growth = 1.0 + 0.04 * (year - 2020) as f64;
            let usd = rng
                .gauss(base * level * scale * growth, base * 0.15)
                .max(5_000.0)
                .round();

            writer.serialize(SalaryRow {
                ano: year,
                senioridade,
                contrato: *rng.pick(&CONTRACTS),
                cargo,
                salario: (usd / fx).round(),
                moeda,
                usd,
                residencia,
                remoto: *rng.pick(&REMOTE),
                empresa: residencia,
                tamanho_empresa: *rng.pick(&SIZES),
                residencia_iso3: iso3,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    log::info!("Wrote {rows} salary records to {output_path}");
    println!("Wrote {rows} salary records to {output_path}");
    Ok(())
}
