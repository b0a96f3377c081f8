use rust_xlsxwriter::Workbook;
use sheetfix_convert::{process_file, ConvertError, ConvertOptions};
use sheetfix_sheet::{CellValue, ExcelReadOptions, Sheet};
use std::path::Path;
use tempfile::tempdir;

const HEADERS: [&str; 9] = [
    "Fecha de compra",
    "Operacion ID",
    "Descripción",
    "Valor de la compra",
    "Comisión más IVA",
    "Estado",
    "Fecha de liberación",
    "Monto neto de operación",
    "Notas",
];

/// A statement export where every amount is stored as text.
fn write_statement(path: &Path) {
    let rows: [[&str; 9]; 3] = [
        [
            "15 de enero de 2024 10:30 hs.",
            "000123",
            "Venta",
            "$ 1.500,00",
            "($ 150,00)",
            "aprobado",
            "2024-01-20",
            "$ 1.350,00",
            "",
        ],
        [
            "16/01/2024",
            "000124",
            "Devolución",
            "$ 200,00",
            "$ 0,00",
            "devuelto",
            "pendiente",
            "-200,00",
            "revisar",
        ],
        [
            "2024-01-17 09:00:00",
            "000125",
            "Venta",
            "$ 1.000,50",
            "(100,05)",
            "aprobado",
            "2024-01-25",
            "900,45",
            "",
        ],
    ];

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet
                    .write_string(r as u32 + 1, col as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_process_statement_xlsx() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("statement.xlsx");
    let output = dir.path().join("statement_convertido.xlsx");
    write_statement(&input);

    let report = process_file(&input, &output, &ConvertOptions::default()).unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(
        report.converted_columns,
        vec![
            "Operacion ID",
            "Valor de la compra",
            "Comisión más IVA",
            "Monto neto de operación"
        ]
    );
    assert_eq!(
        report.date_columns,
        vec!["Fecha de compra", "Fecha de liberación"]
    );

    let summary = report.summary.unwrap();
    assert!((summary.total - 2050.45).abs() < 1e-6);
    assert!((summary.inflows - 2250.45).abs() < 1e-6);
    assert!((summary.outflows + 200.0).abs() < 1e-6);

    let processed = Sheet::from_excel_with_options(
        &output,
        &ExcelReadOptions::default().with_headers(true),
    )
    .unwrap();

    assert_eq!(processed.get_by_name(1, "Operacion ID").unwrap().as_number(), Some(123.0));
    assert_eq!(
        processed.get_by_name(2, "Comisión más IVA").unwrap().as_number(),
        Some(0.0)
    );
    assert_eq!(
        processed.get_by_name(3, "Valor de la compra").unwrap().as_number(),
        Some(1000.5)
    );
    assert!(matches!(
        processed.get_by_name(1, "Fecha de compra").unwrap(),
        CellValue::DateTime(dt) if dt.format("%Y-%m-%d %H:%M").to_string() == "2024-01-15 10:30"
    ));
    assert!(processed.get_by_name(2, "Fecha de liberación").unwrap().is_null());
    assert_eq!(
        processed.get_by_name(1, "Descripción").unwrap(),
        &CellValue::from("Venta")
    );
    assert_eq!(
        processed.get_by_name(2, "Notas").unwrap(),
        &CellValue::from("revisar")
    );
}

#[test]
fn test_process_csv_to_csv() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ventas.csv");
    let output = dir.path().join("ventas_convertido.csv");
    std::fs::write(
        &input,
        "producto,precio\nmate,\"$ 1.234,56\"\nbombilla,\"(12,50)\"\n",
    )
    .unwrap();

    let report = process_file(&input, &output, &ConvertOptions::default()).unwrap();

    assert_eq!(report.converted_columns, vec!["precio"]);
    assert_eq!(report.summary, None);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("mate,1234.56"));
    assert!(written.contains("bombilla,-12.5"));
}

#[test]
fn test_words_only_workbook_is_untouched() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("words.xlsx");
    let output = dir.path().join("words_out.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "words").unwrap();
    for (i, word) in ["one", "two", "three"].iter().enumerate() {
        worksheet.write_string(i as u32 + 1, 0, *word).unwrap();
    }
    workbook.save(&input).unwrap();

    let report = process_file(&input, &output, &ConvertOptions::default()).unwrap();

    assert!(report.converted_columns.is_empty());
    assert!(report.date_columns.is_empty());
    assert_eq!(report.rows, 3);
    assert!(output.exists());
}

#[test]
fn test_invalid_workbook_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("fake.xlsx");
    std::fs::write(&input, b"not really an excel file").unwrap();

    let result = process_file(&input, &dir.path().join("out.xlsx"), &ConvertOptions::default());

    assert!(matches!(result, Err(ConvertError::Sheet(_))));
}
