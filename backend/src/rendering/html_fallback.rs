//! HTML document used when the engine cannot produce a PDF

use std::fmt::Write;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{ReportEnvelope, REPORT_COLUMNS};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; }
        .header { text-align: center; margin-bottom: 30px; }
        .title { font-size: 18px; font-weight: bold; margin-bottom: 10px; }
        .info { margin-bottom: 20px; }
        .info-row { margin-bottom: 5px; }
        table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; font-weight: bold; }
        .totals { margin-top: 20px; }
        .total-section { margin-bottom: 15px; }
        .total-title { font-weight: bold; margin-bottom: 5px; }
        .printed { font-size: 10px; color: #888; }
"#;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Render the report as a standalone HTML page
///
/// `printed_at` only feeds the "Dicetak" footer line; everything else is a
/// function of the envelope.
pub fn render_html(envelope: &ReportEnvelope, printed_at: DateTime<Utc>) -> String {
    let mut html = String::with_capacity(4096 + envelope.datas.len() * 512);
    let info = &envelope.info;
    let totals = &envelope.totals;

    // `write!` into a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="header">
        <div class="title">{title}</div>
        <div>Kode: {code}</div>
        <div>Periode: {periode}</div>
        <div>User: {user}</div>
    </div>

    <div class="info">
        <div class="info-row">Kantor Wilayah: {nkw} ({kkw})</div>
        <div class="info-row">Kantor: {nk} ({kk})</div>
    </div>

    <table>
        <thead>
            <tr>
"#,
        title = escape(&envelope.title),
        style = STYLE,
        code = escape(&envelope.code),
        periode = escape(&envelope.periode),
        user = escape(&envelope.user),
        nkw = escape(&info.nama_kantor_wilayah),
        kkw = escape(&info.kode_kantor_wilayah),
        nk = escape(&info.nama_kantor),
        kk = escape(&info.kode_kantor),
    );

    for column in REPORT_COLUMNS {
        let _ = writeln!(html, "                <th>{}</th>", escape(column));
    }
    html.push_str("            </tr>\n        </thead>\n        <tbody>\n");

    for row in &envelope.datas {
        html.push_str("            <tr>\n");
        for field in row.tabular_fields() {
            let _ = writeln!(html, "                <td>{}</td>", escape(field));
        }
        html.push_str("            </tr>\n");
    }

    let _ = write!(
        html,
        r#"        </tbody>
    </table>

    <div class="totals">
        <div class="total-section">
            <div class="total-title">Total Target:</div>
            <div>Total Tanaman: {total}</div>
            <div>Total Hasil Estimasi: {yield_total}</div>
            <div>Rata-rata Perkecambahan: {germination}%</div>
        </div>
        <div class="total-section">
            <div class="total-title">Total Kategori:</div>
            <div>Tanaman Tahunan: {perennial}</div>
            <div>Tanaman Musiman: {annual}</div>
            <div>Dengan Varietas: {variety}</div>
            <div>Dengan Metode Pembibitan: {start_method}</div>
            <div>Dengan Profil Cahaya: {light}</div>
        </div>
        <div class="total-section">
            <div class="total-title">Total Keuangan:</div>
            <div>Total Pendapatan Estimasi: {revenue}</div>
            <div>Rata-rata Pendapatan: {avg_revenue}</div>
        </div>
    </div>

    <div class="printed">Dicetak: {printed}</div>
</body>
</html>
"#,
        total = totals.target.total_count,
        yield_total = totals.target.total_expected_yield,
        germination = two_places(totals.target.average_germination_rate),
        perennial = totals.category.perennial_count,
        annual = totals.category.annual_count,
        variety = totals.category.with_variety,
        start_method = totals.category.with_start_method,
        light = totals.category.with_light_profile,
        revenue = totals.financial.total_estimated_revenue,
        avg_revenue = two_places(totals.financial.average_revenue),
        printed = printed_at.format("%d-%m-%Y %H:%M:%S UTC"),
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::{build_report, Crop};

    fn crops() -> Vec<Crop> {
        vec![
            Crop {
                id: 1,
                name: "Durian".to_string(),
                germination_rate: Some(Decimal::from(70)),
                estimated_revenue: Some(Decimal::from(100)),
                is_perennial: true,
                ..Default::default()
            },
            Crop {
                id: 2,
                name: "Kangkung <air>".to_string(),
                germination_rate: Some(Decimal::from(75)),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_one_table_row_per_record() {
        let html = render_html(&build_report(&crops(), None, None), Utc::now());
        assert_eq!(html.matches("<tr>").count(), 3); // header + 2 rows
        assert_eq!(html.matches("<th>").count(), 22);
    }

    #[test]
    fn test_totals_are_rendered() {
        let html = render_html(&build_report(&crops(), Some("02-2024"), None), Utc::now());

        assert!(html.contains("Periode: 02-2024"));
        assert!(html.contains("Total Tanaman: 2"));
        assert!(html.contains("Rata-rata Perkecambahan: 72.50%"));
        assert!(html.contains("Tanaman Tahunan: 1"));
        assert!(html.contains("Rata-rata Pendapatan: 50.00"));
        assert!(html.contains("Kantor: GRHA BPJAMSOSTEK (J0P)"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_html(&build_report(&crops(), None, None), Utc::now());
        assert!(html.contains("Kangkung &lt;air&gt;"));
        assert!(!html.contains("<air>"));
    }

    #[test]
    fn test_output_is_deterministic_for_fixed_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).unwrap();
        let envelope = build_report(&crops(), None, None);

        let first = render_html(&envelope, at);
        assert_eq!(first, render_html(&envelope, at));
        assert!(first.contains("Dicetak: 01-08-2025 09:30:00 UTC"));
    }
}
