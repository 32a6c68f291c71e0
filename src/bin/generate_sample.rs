//! Write a synthetic `mercados subsidiários.csv` (semicolon-delimited,
//! Windows-1252 encoded) for trying out the viewer.

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::WINDOWS_1252;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

// (market, state) pairs
const ORIGINS: &[(&str, &str)] = &[
    ("São Paulo", "SP"),
    ("Campinas", "SP"),
    ("Curitiba", "PR"),
    ("Belo Horizonte", "MG"),
    ("Goiânia", "GO"),
];

const DESTINATIONS: &[(&str, &str)] = &[
    ("Belém", "PA"),
    ("Recife", "PE"),
    ("Manaus", "AM"),
    ("Florianópolis", "SC"),
    ("Vitória", "ES"),
    ("Porto Alegre", "RS"),
];

const PRODUCTS: &[&str] = &["Açúcar", "Café", "Soja", "Milho", "Algodão"];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mercados subsidiários.csv".to_string());
    let rows = 200;
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    writer.write_record([
        "Origem",
        "UF_Origem",
        "UF_Destino",
        "Destino",
        "Produto",
        "Volume_t",
        "Frete_R$",
        "Observação",
    ])?;

    for i in 0..rows {
        let (origin, origin_state) = *rng.pick(ORIGINS);
        let (destination, destination_state) = *rng.pick(DESTINATIONS);
        let product = *rng.pick(PRODUCTS);
        let volume = 5.0 + rng.next_f64() * 95.0;
        let freight = volume * (80.0 + rng.next_f64() * 40.0);
        // A few non-numeric cells so coercion has something to skip.
        let volume_cell = if i % 37 == 0 {
            "n/d".to_string()
        } else {
            format!("{volume:.1}")
        };

        writer.write_record([
            origin,
            origin_state,
            destination_state,
            destination,
            product,
            volume_cell.as_str(),
            format!("{freight:.2}").as_str(),
            if i % 5 == 0 { "entrega prioritária" } else { "" },
        ])?;
    }

    let buf = writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV: {}", e.error()))?;
    let text = String::from_utf8(buf)?;
    let (bytes, _, had_errors) = WINDOWS_1252.encode(&text);
    if had_errors {
        bail!("sample text is not representable in windows-1252");
    }
    std::fs::write(&output_path, &bytes).with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {rows} records to {output_path}");
    Ok(())
}
