// HerdImport - core/template.rs
//
// Fixed example inputs offered as downloadable templates, one per mode.

use crate::core::model::ImportMode;

const EXCEL_TEMPLATE: &str = "\
Série\tRGN\tLote\tLocal\tPeso\tCE\tSexo\tiABCZ\tDeca\tMGTe\tTop\tNascimento\tIdade\tPai\tAvô Materno
CJCJ\t15628\t22\t3\t913\t42\tM\t24,62\t1\t22,1\t8\t09/08/23\t24\tREM HERMOSO FIV GEN\tB2887 DA S.NICE
CJCJ\t15631\t22\t3\t780\t\tF\t18,40\t2\t15,7\t14\t21/09/23\t23\tREM ARMADOR\tC4410 DA GAROUPA
";

const CSV_TEMPLATE: &str = "\
Serie,RGN,Nascimento,Pai,AvoMaterno,Sexo
CJCJ,123456,2022-01-15,CJCJ 100001,CJCJ 100002,Macho
CJCJ,123457,15/03/2022,CJCJ 100001,CJCJ 100003,Fêmea
";

const MANUAL_TEMPLATE: &str = "\
CJCJ|123458|M|10/05/23|REM HERMOSO FIV GEN|B2887 DA S.NICE
CJCJ|123459|F|11/05/2023|REM ARMADOR|C4410 DA GAROUPA
";

/// Example text for an import mode.
pub fn template_for(mode: ImportMode) -> &'static str {
    match mode {
        ImportMode::Excel => EXCEL_TEMPLATE,
        ImportMode::Csv => CSV_TEMPLATE,
        ImportMode::Manual => MANUAL_TEMPLATE,
    }
}

/// Suggested download file name for a template.
pub fn template_file_name(mode: ImportMode) -> &'static str {
    match mode {
        ImportMode::Excel => "herd_template.tsv",
        ImportMode::Csv => "herd_template.csv",
        ImportMode::Manual => "herd_template.txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::importer::{import_batch, ImportOptions};
    use chrono::NaiveDate;

    #[test]
    fn test_every_template_imports_cleanly() {
        for mode in ImportMode::all() {
            let options = ImportOptions {
                today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                ..ImportOptions::new(*mode)
            };
            let summary = import_batch(template_for(*mode), &options);
            assert!(summary.errors.is_empty(), "{mode}: {:?}", summary.errors);
            assert_eq!(summary.success.len(), 2, "{mode}");
            assert_eq!(summary.total, 2, "{mode}");
        }
    }

    #[test]
    fn test_file_names_match_mode() {
        assert!(template_file_name(ImportMode::Csv).ends_with(".csv"));
        assert!(template_file_name(ImportMode::Excel).ends_with(".tsv"));
    }
}
