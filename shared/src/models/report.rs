//! Report envelope models and the crop-to-report transformation
//!
//! The envelope key names are consumed verbatim by the rendering engine
//! templates, so the serde renames here are part of the external contract.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Crop;

/// Template path reported in every envelope
pub const REPORT_TEMPLATE: &str = "/KN/KNRKKP008/KNRKKP008-main";
pub const REPORT_CODE: &str = "KNRKKP008";
pub const REPORT_TITLE: &str = "REKAPITULASI DATA TANAMAN DAN PRODUKTIVITAS PERTANIAN";
pub const REPORT_MESSAGE: &str = "Berhasil";

/// Periode used when the request does not carry one
pub const DEFAULT_PERIODE: &str = "08-2025";
/// User used when the request does not carry one
pub const DEFAULT_USER: &str = "SYSTEM";

pub const YES: &str = "Ya";
pub const NO: &str = "Tidak";

const MISSING_TEXT: &str = "-";
const MISSING_NUMBER: &str = "0";

/// Decimal places kept on report averages
pub const AVERAGE_SCALE: u32 = 2;

/// Column headers of the tabular renderings, in output order
pub const REPORT_COLUMNS: [&str; 22] = [
    "Kode Tanaman",
    "Nama Tanaman",
    "Jenis Tanaman",
    "Varietas",
    "Metode Pembibitan",
    "Tingkat Perkecambahan",
    "Benih per Sel",
    "Profil Cahaya",
    "Kondisi Tanah",
    "Hari Muncul",
    "Jarak Tanam",
    "Jarak Baris",
    "Kedalaman Tanam",
    "Tinggi Rata-rata",
    "Hari Berbunga",
    "Hari Panen",
    "Jendela Panen",
    "Tingkat Kehilangan",
    "Satuan Panen",
    "Pendapatan Estimasi",
    "Hasil Estimasi",
    "Tanaman Tahunan",
];

/// The report payload handed to renderers and returned by the JSON endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub template: String,
    #[serde(rename = "responseCode")]
    pub response_code: u16,
    pub message: String,
    pub code: String,
    pub title: String,
    pub user: String,
    pub periode: String,
    pub datas: Vec<ReportRow>,
    pub info: OfficeInfo,
    pub totals: ReportTotals,
}

/// One crop, flattened into display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReportRow {
    pub kode_tanaman: String,
    pub nama_tanaman: String,
    pub jenis_tanaman: String,
    pub varietas: String,
    pub metode_pembibitan: String,
    pub tingkat_perkecambahan: String,
    pub benih_per_sel: String,
    pub profil_cahaya: String,
    pub kondisi_tanah: String,
    pub hari_muncul: String,
    pub jarak_tanam: String,
    pub jarak_baris: String,
    pub kedalaman_tanam: String,
    pub tinggi_rata_rata: String,
    pub hari_berbunga: String,
    pub hari_panen: String,
    pub jendela_panen: String,
    pub tingkat_kehilangan: String,
    pub satuan_panen: String,
    pub pendapatan_estimasi: String,
    pub hasil_estimasi: String,
    pub detail_penanaman: String,
    pub detail_pemangkasan: String,
    pub nama_botanis: String,
    pub tanaman_tahunan: String,
    pub buat_tugas_otomatis: String,
}

/// Static office identity printed in every report header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeInfo {
    pub kode_kantor_wilayah: String,
    pub nama_kantor_wilayah: String,
    pub kode_kantor: String,
    pub nama_kantor: String,
}

impl Default for OfficeInfo {
    fn default() -> Self {
        Self {
            kode_kantor_wilayah: "903".to_string(),
            nama_kantor_wilayah: "KANWIL DKI JAKARTA".to_string(),
            kode_kantor: "J0P".to_string(),
            nama_kantor: "GRHA BPJAMSOSTEK".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    #[serde(rename = "totalTarget")]
    pub target: TargetTotals,
    #[serde(rename = "totalKategori")]
    pub category: CategoryTotals,
    #[serde(rename = "totalKeuangan")]
    pub financial: FinancialTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetTotals {
    #[serde(rename = "TOTAL_TANAMAN")]
    pub total_count: u64,
    #[serde(rename = "TOTAL_HASIL_ESTIMASI", with = "rust_decimal::serde::float")]
    pub total_expected_yield: Decimal,
    /// Percent; zero for an empty report
    #[serde(rename = "RATA_RATA_PERKECAMBAHAN", with = "rust_decimal::serde::float")]
    pub average_germination_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    #[serde(rename = "TANAMAN_TAHUNAN")]
    pub perennial_count: u64,
    #[serde(rename = "TANAMAN_MUSIMAN")]
    pub annual_count: u64,
    #[serde(rename = "DENGAN_VARIETAS")]
    pub with_variety: u64,
    #[serde(rename = "DENGAN_METODE_PEMBIBITAN")]
    pub with_start_method: u64,
    #[serde(rename = "DENGAN_PROFIL_CAHAYA")]
    pub with_light_profile: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTotals {
    #[serde(rename = "TOTAL_PENDAPATAN_ESTIMASI", with = "rust_decimal::serde::float")]
    pub total_estimated_revenue: Decimal,
    #[serde(rename = "RATA_RATA_PENDAPATAN", with = "rust_decimal::serde::float")]
    pub average_revenue: Decimal,
}

fn text_or_dash(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING_TEXT.to_string(),
    }
}

fn number_or_zero<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| MISSING_NUMBER.to_string())
}

fn yes_no(flag: bool) -> String {
    let token = if flag { YES } else { NO };
    token.to_string()
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

impl From<&Crop> for ReportRow {
    fn from(crop: &Crop) -> Self {
        Self {
            kode_tanaman: crop.id.to_string(),
            nama_tanaman: crop.name.clone(),
            jenis_tanaman: text_or_dash(&crop.crop_type),
            varietas: text_or_dash(&crop.variety),
            metode_pembibitan: text_or_dash(&crop.start_method),
            tingkat_perkecambahan: number_or_zero(&crop.germination_rate),
            benih_per_sel: number_or_zero(&crop.seed_per_cell),
            profil_cahaya: text_or_dash(&crop.light_profile),
            kondisi_tanah: text_or_dash(&crop.soil_condition),
            hari_muncul: number_or_zero(&crop.days_to_emerge),
            jarak_tanam: number_or_zero(&crop.plant_spacing),
            jarak_baris: number_or_zero(&crop.row_spacing),
            kedalaman_tanam: number_or_zero(&crop.planting_depth),
            tinggi_rata_rata: number_or_zero(&crop.average_height),
            hari_berbunga: number_or_zero(&crop.days_to_flower),
            hari_panen: number_or_zero(&crop.days_to_maturity),
            jendela_panen: number_or_zero(&crop.harvest_window),
            tingkat_kehilangan: number_or_zero(&crop.loss_rate),
            satuan_panen: text_or_dash(&crop.harvest_unit),
            pendapatan_estimasi: number_or_zero(&crop.estimated_revenue),
            hasil_estimasi: number_or_zero(&crop.expected_yield),
            detail_penanaman: text_or_dash(&crop.planting_details),
            detail_pemangkasan: text_or_dash(&crop.pruning_details),
            nama_botanis: text_or_dash(&crop.botanical_name),
            tanaman_tahunan: yes_no(crop.is_perennial),
            buat_tugas_otomatis: yes_no(crop.auto_create_tasks),
        }
    }
}

impl ReportRow {
    /// The row's values in [`REPORT_COLUMNS`] order
    pub fn tabular_fields(&self) -> [&str; 22] {
        [
            self.kode_tanaman.as_str(),
            self.nama_tanaman.as_str(),
            self.jenis_tanaman.as_str(),
            self.varietas.as_str(),
            self.metode_pembibitan.as_str(),
            self.tingkat_perkecambahan.as_str(),
            self.benih_per_sel.as_str(),
            self.profil_cahaya.as_str(),
            self.kondisi_tanah.as_str(),
            self.hari_muncul.as_str(),
            self.jarak_tanam.as_str(),
            self.jarak_baris.as_str(),
            self.kedalaman_tanam.as_str(),
            self.tinggi_rata_rata.as_str(),
            self.hari_berbunga.as_str(),
            self.hari_panen.as_str(),
            self.jendela_panen.as_str(),
            self.tingkat_kehilangan.as_str(),
            self.satuan_panen.as_str(),
            self.pendapatan_estimasi.as_str(),
            self.hasil_estimasi.as_str(),
            self.tanaman_tahunan.as_str(),
        ]
    }
}

/// Mean rounded half away from zero to [`AVERAGE_SCALE`]; zero for an empty set
fn average(sum: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (sum / Decimal::from(count))
        .round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl ReportTotals {
    /// Compute every aggregate in a single pass over the crops
    pub fn from_crops(crops: &[Crop]) -> Self {
        let mut total_count = 0u64;
        let mut yield_sum = Decimal::ZERO;
        let mut germination_sum = Decimal::ZERO;
        let mut revenue_sum = Decimal::ZERO;
        let mut category = CategoryTotals {
            perennial_count: 0,
            annual_count: 0,
            with_variety: 0,
            with_start_method: 0,
            with_light_profile: 0,
        };

        for crop in crops {
            total_count += 1;
            // Sums saturate at the Decimal bounds
            yield_sum = yield_sum.saturating_add(crop.expected_yield.unwrap_or_default());
            germination_sum =
                germination_sum.saturating_add(crop.germination_rate.unwrap_or_default());
            revenue_sum = revenue_sum.saturating_add(crop.estimated_revenue.unwrap_or_default());

            if crop.is_perennial {
                category.perennial_count += 1;
            } else {
                category.annual_count += 1;
            }
            category.with_variety += u64::from(is_present(&crop.variety));
            category.with_start_method += u64::from(is_present(&crop.start_method));
            category.with_light_profile += u64::from(is_present(&crop.light_profile));
        }

        Self {
            target: TargetTotals {
                total_count,
                total_expected_yield: yield_sum,
                average_germination_rate: average(germination_sum, total_count),
            },
            category,
            financial: FinancialTotals {
                total_estimated_revenue: revenue_sum,
                average_revenue: average(revenue_sum, total_count),
            },
        }
    }
}

/// Build the report envelope for a set of crops
///
/// `periode` and `user` are echoed into the header and fall back to
/// [`DEFAULT_PERIODE`] and [`DEFAULT_USER`]. The function is total: an empty
/// slice produces an empty table with zeroed totals.
pub fn build_report(crops: &[Crop], periode: Option<&str>, user: Option<&str>) -> ReportEnvelope {
    ReportEnvelope {
        template: REPORT_TEMPLATE.to_string(),
        response_code: 200,
        message: REPORT_MESSAGE.to_string(),
        code: REPORT_CODE.to_string(),
        title: REPORT_TITLE.to_string(),
        user: user.unwrap_or(DEFAULT_USER).to_string(),
        periode: periode.unwrap_or(DEFAULT_PERIODE).to_string(),
        datas: crops.iter().map(ReportRow::from).collect(),
        info: OfficeInfo::default(),
        totals: ReportTotals::from_crops(crops),
    }
}
