use chrono::{Days, NaiveDate};
use duckdb::{params, Connection};

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

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }
}

struct Product {
    name: &'static str,
    category: &'static str,
    subcategory: &'static str,
    cost: f64,
    price: f64,
    maintenance: &'static str,
}

const PRODUCTS: &[Product] = &[
    Product { name: "Road-150 Red", category: "Bikes", subcategory: "Road Bikes", cost: 2171.29, price: 3578.27, maintenance: "Yes" },
    Product { name: "Mountain-200 Black", category: "Bikes", subcategory: "Mountain Bikes", cost: 1251.98, price: 2294.99, maintenance: "Yes" },
    Product { name: "Touring-1000 Blue", category: "Bikes", subcategory: "Touring Bikes", cost: 1481.94, price: 2384.07, maintenance: "Yes" },
    Product { name: "Sport-100 Helmet", category: "Accessories", subcategory: "Helmets", cost: 12.03, price: 34.99, maintenance: "No" },
    Product { name: "Water Bottle", category: "Accessories", subcategory: "Bottles and Cages", cost: 1.87, price: 4.99, maintenance: "No" },
    Product { name: "Fender Set", category: "Accessories", subcategory: "Fenders", cost: 8.22, price: 21.98, maintenance: "No" },
    Product { name: "Long-Sleeve Jersey", category: "Clothing", subcategory: "Jerseys", cost: 38.49, price: 49.99, maintenance: "No" },
    Product { name: "Cycling Cap", category: "Clothing", subcategory: "Caps", cost: 5.70, price: 8.99, maintenance: "No" },
];

/// Raw country spellings on purpose: the dashboard's normalizer has to earn
/// its keep.
const COUNTRIES: &[&str] = &[
    "us", "USA", "United States", "DE", "Germany", "Germeny", "FR", "france", "AUSTRALIA", "Canada",
];

fn date_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sales.duckdb";
    let conn = Connection::open(output_path).expect("Failed to open output database");
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS dashboard_data;
        CREATE TABLE dashboard_data (
            sls_ord_num VARCHAR,
            cid BIGINT,
            prd_nm VARCHAR,
            cat VARCHAR,
            subcat VARCHAR,
            order_date VARCHAR,
            ship_date VARCHAR,
            due_date VARCHAR,
            birth_date VARCHAR,
            customer_creation_date VARCHAR,
            product_start_date VARCHAR,
            product_end_date VARCHAR,
            sls_quantity INTEGER,
            sls_price DOUBLE,
            prd_cost DOUBLE,
            cntry VARCHAR,
            maintenance VARCHAR
        );
        "#,
    )
    .expect("Failed to create dashboard_data");

    // Customers: id, birth date, creation date, home country
    let epoch = NaiveDate::from_ymd_opt(1955, 1, 1).unwrap();
    let customers: Vec<(i64, NaiveDate, NaiveDate, &str)> = (0..120)
        .map(|i| {
            let birth = epoch
                .checked_add_days(Days::new(rng.range(0, 45 * 365) as u64))
                .unwrap();
            let created = NaiveDate::from_ymd_opt(2015, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(rng.range(0, 8 * 365) as u64))
                .unwrap();
            (11000 + i, birth, created, *rng.pick(COUNTRIES))
        })
        .collect();

    let first_order_day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut insert = conn
        .prepare(
            "INSERT INTO dashboard_data VALUES \
             (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .expect("Failed to prepare insert");

    let mut order_lines = 0usize;
    for order_no in 0..400 {
        let (cid, birth, created, country) = *rng.pick(&customers);
        let order_date = first_order_day
            .checked_add_days(Days::new(rng.range(0, 540) as u64))
            .unwrap();
        let ship_date = order_date
            .checked_add_days(Days::new(rng.range(1, 12) as u64))
            .unwrap();
        let due_date = order_date
            .checked_add_days(Days::new(7))
            .unwrap();

        let lines = rng.range(1, 3);
        for _ in 0..lines {
            let product = rng.pick(PRODUCTS);
            // A few deliberately messy rows: zero quantities, unparseable
            // dates, missing ship dates.
            let quantity = if rng.next_f64() < 0.02 {
                0
            } else {
                rng.range(1, 4)
            };
            let order_date_cell = if rng.next_f64() < 0.01 {
                "not-a-date".to_string()
            } else {
                date_str(order_date)
            };
            let ship_date_cell = if rng.next_f64() < 0.03 {
                None
            } else {
                Some(date_str(ship_date))
            };

            insert
                .execute(params![
                    format!("SO{}", 43000 + order_no),
                    cid,
                    product.name,
                    product.category,
                    product.subcategory,
                    order_date_cell,
                    ship_date_cell,
                    date_str(due_date),
                    date_str(birth),
                    date_str(created),
                    "2020-01-01",
                    Option::<String>::None,
                    quantity,
                    product.price,
                    product.cost,
                    country,
                    product.maintenance,
                ])
                .expect("Failed to insert row");
            order_lines += 1;
        }
    }

    println!("Wrote {order_lines} order lines to {output_path} (table dashboard_data)");
}
