use rust_xlsxwriter::{Format, Workbook};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One sales record; `None` marks a deliberately missing value.
#[derive(Clone)]
struct Sale {
    region: &'static str,
    store: u32,
    units: Option<u32>,
    unit_price: Option<f64>,
    promo: bool,
}

impl Sale {
    fn fields(&self) -> [String; 5] {
        [
            self.region.to_string(),
            self.store.to_string(),
            self.units.map(|u| u.to_string()).unwrap_or_default(),
            self.unit_price.map(|p| p.to_string()).unwrap_or_default(),
            if self.promo { "True" } else { "False" }.to_string(),
        ]
    }
}

const HEADERS: [&str; 5] = ["region", "store", "units", "unit_price", "promo"];

fn generate(rng: &mut SimpleRng, rows: usize) -> Vec<Sale> {
    let regions = ["North", "South", "East", "West"];
    let mut sales: Vec<Sale> = Vec::with_capacity(rows);

    while sales.len() < rows {
        // Roughly one row in ten repeats an earlier one.
        if !sales.is_empty() && rng.chance(0.1) {
            let earlier = sales[rng.below(sales.len())].clone();
            sales.push(earlier);
            continue;
        }
        let store = 1 + rng.below(5) as u32;
        let price = (5.0 + rng.next_f64() * 45.0) * 100.0;
        sales.push(Sale {
            region: regions[rng.below(regions.len())],
            store,
            units: (!rng.chance(0.08)).then(|| 1 + rng.below(40) as u32),
            unit_price: (!rng.chance(0.08)).then(|| price.round() / 100.0),
            promo: rng.chance(0.3),
        });
    }
    sales
}

fn write_csv(path: &str, sales: &[Sale]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for sale in sales {
        writer.write_record(sale.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, sales: &[Sale]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (c, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *name, &bold)?;
    }
    for (r, sale) in sales.iter().enumerate() {
        let row = r as u32 + 1;
        sheet.write_string(row, 0, sale.region)?;
        sheet.write_number(row, 1, sale.store)?;
        if let Some(units) = sale.units {
            sheet.write_number(row, 2, units)?;
        }
        if let Some(price) = sale.unit_price {
            sheet.write_number(row, 3, price)?;
        }
        sheet.write_boolean(row, 4, sale.promo)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let sales = generate(&mut rng, 200);

    write_csv("sample_sales.csv", &sales)?;
    write_xlsx("sample_sales.xlsx", &sales)?;

    println!(
        "Wrote {} sales records to sample_sales.csv and sample_sales.xlsx",
        sales.len()
    );
    Ok(())
}
