use std::fs;
use std::path::{Path, PathBuf};

/// Header row for a minimal violations export fixture, with exactly the
/// projected columns in schema order.
pub(crate) const VIOLATIONS_CSV_HEADER: &str = "Summons Number,Plate ID,Registration State,\
     Issue Date,Street Name,Violation Code,Violation Description\n";

/// Write `contents` to `dir/name` and return the full path.
pub(crate) fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Create a partition folder holding the given `(name, contents)` files.
pub(crate) fn make_partition(root: &Path, folder: &str, files: &[(&str, &str)]) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    for (name, contents) in files {
        write_file(&dir, name, contents);
    }
}

/// One 13 column air quality CSV row, with a trailing newline.
pub(crate) fn air_quality_line(
    aqi: &str,
    parameter: &str,
    site_name: &str,
    site_agency: &str,
) -> String {
    format!(
        "40.1,-105.0,2020-01-01T00:00,{parameter},12.0,UG/M3,12.0,{aqi},1,{site_name},\
         {site_agency},840MMFS10101,840MMFS10101\n"
    )
}

/// One violations export row matching [VIOLATIONS_CSV_HEADER].
pub(crate) fn violation_line(summons: &str, plate: &str, code: &str) -> String {
    format!("{summons},{plate},NY,06/14/2019,W 43rd St,{code},Street Cleaning\n")
}

/// A violation codes reference fixture with the quoted multi-line fee
/// headers of the published file.
pub(crate) fn violation_codes_csv() -> String {
    concat!(
        "VIOLATION CODE,DEFINITION,",
        "\"Manhattan  96th St. & below\n(Fine Amount $)\",",
        "\"All Other Areas\n(Fine Amount $)\"\n",
        "21,STREET CLEANING,65,45\n",
        "14,NO STANDING,115,115\n",
        "99,OTHER,,never-collected\n",
    )
    .to_string()
}

/// A wide census fixture with three countries, three years, and one empty
/// cell.
pub(crate) fn census_csv() -> String {
    concat!(
        "Country Name,Country Code,Indicator Name,Indicator Code,1960,1961,1962\n",
        "Aruba,ABW,\"Population, total\",SP.POP.TOTL,54208,55434,56234\n",
        "Zimbabwe,ZWE,\"Population, total\",SP.POP.TOTL,3776681,3905034,4039201\n",
        "Eritrea,ERI,\"Population, total\",SP.POP.TOTL,1007590,,1033328\n",
    )
    .to_string()
}
