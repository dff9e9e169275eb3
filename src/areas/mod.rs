//! Sources of zip codes to analyze: the built-in metro table, comma
//! separated lists and zip code files.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::path::Path;

/// Sample zip codes from major US metro areas.
pub const MAJOR_METROS: &[(&str, &[&str])] = &[
    (
        "NYC",
        &[
            "10001", "10002", "10003", "10009", "10010", "10011", "10012", "10013", "10014",
            "10016", "10017", "10018", "10019", "10021", "10022", "10023", "10024", "10025",
            "10026", "10027", "10028", "10029", "10030", "10031",
        ],
    ),
    (
        "LA",
        &[
            "90001", "90002", "90003", "90004", "90005", "90006", "90007", "90008", "90012",
            "90013", "90014", "90015", "90016", "90017", "90018", "90019", "90020", "90021",
            "90028", "90029", "90031", "90032", "90033", "90034",
        ],
    ),
    (
        "Chicago",
        &[
            "60601", "60602", "60603", "60604", "60605", "60606", "60607", "60608", "60609",
            "60610", "60611", "60612", "60613", "60614", "60615", "60616", "60617", "60618",
            "60619", "60620", "60621", "60622", "60623", "60624",
        ],
    ),
    (
        "Houston",
        &[
            "77001", "77002", "77003", "77004", "77005", "77006", "77007", "77008", "77009",
            "77010", "77011", "77012", "77013", "77014", "77015", "77016", "77017", "77018",
            "77019", "77020", "77021", "77022", "77023", "77024",
        ],
    ),
    (
        "Phoenix",
        &[
            "85001", "85002", "85003", "85004", "85006", "85007", "85008", "85009", "85012",
            "85013", "85014", "85015", "85016", "85017", "85018", "85019", "85020", "85021",
            "85022", "85023", "85024", "85027", "85028", "85029",
        ],
    ),
    (
        "Dallas",
        &[
            "75201", "75202", "75203", "75204", "75205", "75206", "75207", "75208", "75209",
            "75210", "75211", "75212", "75214", "75215", "75216", "75217", "75218", "75219",
            "75220", "75223", "75224", "75225", "75226", "75227",
        ],
    ),
    (
        "Miami",
        &[
            "33101", "33109", "33122", "33125", "33126", "33127", "33128", "33129", "33130",
            "33131", "33132", "33133", "33134", "33135", "33136", "33137", "33138", "33139",
            "33140", "33141", "33142", "33143", "33144", "33145",
        ],
    ),
    (
        "Seattle",
        &[
            "98101", "98102", "98103", "98104", "98105", "98106", "98107", "98108", "98109",
            "98112", "98115", "98116", "98117", "98118", "98119", "98121", "98122", "98125",
            "98126", "98133", "98134", "98136", "98144", "98146",
        ],
    ),
    (
        "Boston",
        &[
            "02108", "02109", "02110", "02111", "02113", "02114", "02115", "02116", "02118",
            "02119", "02120", "02121", "02122", "02124", "02125", "02126", "02127", "02128",
            "02129", "02130", "02131", "02132", "02134", "02135",
        ],
    ),
    (
        "Austin",
        &[
            "78701", "78702", "78703", "78704", "78705", "78712", "78717", "78719", "78721",
            "78722", "78723", "78724", "78725", "78726", "78727", "78728", "78729", "78730",
            "78731", "78732", "78733", "78734", "78735", "78736",
        ],
    ),
];

/// Trim a zip code and left-pad purely numeric codes to five digits
/// (CSV tools tend to drop the leading zero of "02108").
pub fn normalize_zipcode(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.len() < 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>5}", trimmed)
    } else {
        trimmed.to_string()
    }
}

pub fn metro_names() -> Vec<&'static str> {
    MAJOR_METROS.iter().map(|(name, _)| *name).collect()
}

/// Zip codes for a metro, matched case-insensitively.
pub fn get_metro_zipcodes(metro: &str) -> Option<&'static [&'static str]> {
    MAJOR_METROS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(metro.trim()))
        .map(|(_, zipcodes)| *zipcodes)
}

/// The first `count` zip codes across all metros, in table order.
pub fn sample_zipcodes(count: usize) -> Vec<String> {
    MAJOR_METROS
        .iter()
        .flat_map(|(_, zipcodes)| zipcodes.iter())
        .take(count)
        .map(|z| z.to_string())
        .collect()
}

/// Split a comma separated list, dropping empty entries.
pub fn parse_zipcode_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_zipcode)
        .filter(|z| !z.is_empty())
        .collect()
}

/// Load zip codes from a file.
///
/// `.csv` files are read by their `zipcode` column; anything else is read
/// as one zip code per line.
pub fn load_zipcodes_from_file(path: &Path) -> Result<Vec<String>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        load_zipcodes_from_csv(path, "zipcode")
    } else {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read zip code file {}", path.display()))?;
        Ok(content
            .lines()
            .map(normalize_zipcode)
            .filter(|z| !z.is_empty())
            .collect())
    }
}

fn load_zipcodes_from_csv(path: &Path, column: &str) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open zip code file {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", path.display()))?;
    let Some(index) = headers.iter().position(|h| h.trim() == column) else {
        bail!("Column '{}' not found in {}", column, path.display());
    };

    let mut zipcodes = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("Invalid CSV row in {}", path.display()))?;
        if let Some(value) = row.get(index) {
            let zipcode = normalize_zipcode(value);
            if !zipcode.is_empty() {
                zipcodes.push(zipcode);
            }
        }
    }
    Ok(zipcodes)
}
