use std::path::Path;

use image::{Rgb, RgbImage};

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

    /// Uniform pick from 0..n.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

const IMAGE_SIZE: u32 = 96;

/// Solid background tile, optionally with a light "logo" block.
fn render_ad(rgb: [u8; 3], logo_present: bool) -> RgbImage {
    let mut img = RgbImage::from_pixel(IMAGE_SIZE, IMAGE_SIZE, Rgb(rgb));
    if logo_present {
        for y in 8..24 {
            for x in 8..24 {
                img.put_pixel(x, y, Rgb([245, 245, 245]));
            }
        }
    }
    img
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = Path::new("demo-data");
    std::fs::create_dir_all(out_dir).expect("Failed to create demo-data directory");

    let brands = [
        "acme_sports",
        "blue_river_cafe",
        "copperline_audio",
        "dunewear",
        "evergreen_bank",
    ];
    let tiers = ["gold", "silver", "bronze"];
    let colours: [(&str, [u8; 3]); 6] = [
        ("red", [205, 60, 60]),
        ("blue", [60, 90, 205]),
        ("green", [60, 160, 90]),
        ("yellow", [220, 190, 60]),
        ("white", [235, 235, 235]),
        ("black", [30, 30, 30]),
    ];

    let mut writer =
        csv::Writer::from_path(out_dir.join("ads.csv")).expect("Failed to create ads.csv");
    writer
        .write_record([
            "ad_id",
            "pagename",
            "cluster",
            "tier",
            "dominant_background_colour",
            "logo_present",
        ])
        .expect("Failed to write CSV header");

    let mut ad_id: i64 = 1000;
    let mut count = 0usize;

    for brand in brands {
        // 3–7 ads per brand
        let n = 3 + rng.below(5);
        for _ in 0..n {
            let cluster = rng.below(5);
            let tier = tiers[rng.below(tiers.len() as u64) as usize];
            let (colour_name, rgb) = colours[rng.below(colours.len() as u64) as usize];
            let logo_present = rng.below(2) == 0;

            render_ad(rgb, logo_present)
                .save(out_dir.join(format!("{ad_id}.png")))
                .expect("Failed to write PNG");

            writer
                .write_record([
                    ad_id.to_string(),
                    brand.to_string(),
                    cluster.to_string(),
                    tier.to_string(),
                    colour_name.to_string(),
                    logo_present.to_string(),
                ])
                .expect("Failed to write CSV row");

            ad_id += 1;
            count += 1;
        }
    }

    writer.flush().expect("Failed to flush ads.csv");

    println!(
        "Wrote {count} ads (ads.csv + one PNG each) to {}",
        out_dir.display()
    );
}
