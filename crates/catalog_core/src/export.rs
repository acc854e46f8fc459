use shared::protocol::Product;

use crate::error::{CatalogError, Result};

pub const CSV_HEADER: [&str; 5] = ["ID", "Title", "Price", "Category", "Image URL"];

/// File name offered for the download.
pub const DEFAULT_EXPORT_FILE: &str = "products_export.csv";

/// Serializes `rows` as CSV. Title and category are always quoted; the image URL only
/// when it holds a delimiter. Rows are joined with `\n` without a trailing newline.
pub fn to_csv(rows: &[Product]) -> Result<String> {
    if rows.is_empty() {
        return Err(CatalogError::EmptyExport);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.join(","));
    lines.extend(rows.iter().map(csv_row));
    Ok(lines.join("\n"))
}

fn csv_row(product: &Product) -> String {
    let image = product.primary_image().unwrap_or_default();
    format!(
        "{},{},{},{},{}",
        product.id,
        quote(&product.title),
        format_price(product.price),
        quote(product.category_name().unwrap_or_default()),
        if needs_quoting(image) {
            quote(image)
        } else {
            image.to_string()
        }
    )
}

/// Shortest round-trip decimal inside `[1e-6, 1e21)`, exponent notation with an explicit
/// sign outside it (`1e+21`, `1.5e-7`), which is how the API's JSON numbers print.
fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "0".to_string();
    }
    if !price.is_finite() || (1e-6..1e21).contains(&price.abs()) {
        return price.to_string();
    }
    let exponential = format!("{price:e}");
    match exponential.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exponential,
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn needs_quoting(value: &str) -> bool {
    value.contains([',', '"', '\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{product, with_category, with_image};

    #[test]
    fn empty_rows_are_an_error() {
        assert!(matches!(to_csv(&[]), Err(CatalogError::EmptyExport)));
    }

    #[test]
    fn writes_header_and_escaped_rows() {
        let rows = vec![
            with_image(
                with_category(product(1, "Say \"cheese\" camera", 99.99), 2, "Electronics"),
                "https://i.imgur.com/cam.png",
            ),
            product(12, "Plain mug", 8.0),
        ];

        let csv = to_csv(&rows).expect("csv");

        assert_eq!(
            csv,
            "ID,Title,Price,Category,Image URL\n\
             1,\"Say \"\"cheese\"\" camera\",99.99,\"Electronics\",https://i.imgur.com/cam.png\n\
             12,\"Plain mug\",8,\"\","
        );
    }

    #[test]
    fn quotes_image_urls_containing_commas() {
        let rows = vec![with_image(product(3, "Poster", 5.0), "https://x/a,b.png")];
        let csv = to_csv(&rows).expect("csv");
        assert!(csv.ends_with(",\"https://x/a,b.png\""));
    }

    #[test]
    fn prices_outside_plain_range_use_signed_exponents() {
        assert_eq!(format_price(1e21), "1e+21");
        assert_eq!(format_price(1.25e22), "1.25e+22");
        assert_eq!(format_price(1.5e-7), "1.5e-7");
        assert_eq!(format_price(1e20), "100000000000000000000");
        assert_eq!(format_price(0.000001), "0.000001");
        assert_eq!(format_price(-0.0), "0");
        assert_eq!(format_price(0.1 + 0.2), "0.30000000000000004");
    }
}
