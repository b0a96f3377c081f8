use chrono::NaiveDate;
use sheetfix_sheet::{
    CellValue, ColumnFormat, CsvOptions, ExcelReadOptions, Sheet, SheetError, XlsxWriteOptions,
};
use tempfile::tempdir;

// ===== Sheet Creation Tests =====

#[test]
fn test_sheet_from_data() {
    let sheet = Sheet::from_data(vec![vec![1, 2, 3], vec![4, 5, 6]]);

    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.col_count(), 3);
    assert_eq!(sheet.get(0, 0).unwrap(), &CellValue::Int(1));
    assert_eq!(sheet.get(1, 2).unwrap(), &CellValue::Int(6));
}

#[test]
fn test_sheet_from_strings() {
    let sheet = Sheet::from_data(vec![
        vec!["Fecha", "Monto"],
        vec!["2024-01-15", "$ 1.500,00"],
    ]);

    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::from("$ 1.500,00"));
    assert_eq!(sheet.header_offset(), 0);
}

// ===== Cell and Row Access =====

#[test]
fn test_out_of_bounds_access() {
    let mut sheet = Sheet::from_data(vec![vec![1, 2]]);

    assert!(matches!(
        sheet.get(5, 0),
        Err(SheetError::CellOutOfBounds { row: 5, .. })
    ));
    assert!(sheet.set(0, 9, 1).is_err());
    assert!(matches!(
        sheet.row(3),
        Err(SheetError::RowOutOfBounds { index: 3, count: 1 })
    ));
}

#[test]
fn test_row_append_checks_length() {
    let mut sheet = Sheet::from_data(vec![vec![1, 2, 3]]);

    sheet.row_append(vec![4, 5, 6]).unwrap();
    assert_eq!(sheet.row_count(), 2);

    let result = sheet.row_append(vec![1, 2]);
    assert!(matches!(
        result,
        Err(SheetError::RowLength {
            expected: 3,
            actual: 2
        })
    ));
}

// ===== Named Columns =====

#[test]
fn test_named_columns_and_data_cells() {
    let mut sheet = Sheet::from_data(vec![
        vec![CellValue::from("producto"), CellValue::from("precio")],
        vec![CellValue::from("mate"), CellValue::from("$ 10,00")],
        vec![CellValue::from("yerba"), CellValue::Null],
    ]);
    sheet.name_columns_by_header().unwrap();

    assert_eq!(sheet.header_offset(), 1);
    assert_eq!(sheet.column_position("precio"), Some(1));
    assert_eq!(
        sheet.get_by_name(1, "producto").unwrap(),
        &CellValue::from("mate")
    );

    let values: Vec<&CellValue> = sheet.column_values(1).unwrap().collect();
    assert_eq!(values, vec![&CellValue::from("$ 10,00"), &CellValue::Null]);

    sheet
        .column_map_by_name("precio", |cell| {
            if cell.is_null() {
                CellValue::Null
            } else {
                CellValue::Float(10.0)
            }
        })
        .unwrap();
    assert_eq!(sheet.get(0, 1).unwrap(), &CellValue::from("precio"));
    assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::Float(10.0));
    assert!(sheet.get(2, 1).unwrap().is_null());
}

#[test]
fn test_header_naming_fills_blanks_and_duplicates() {
    let mut sheet = Sheet::from_data(vec![
        vec![
            CellValue::from("monto"),
            CellValue::Null,
            CellValue::from("monto"),
            CellValue::from(" monto "),
        ],
        vec![
            CellValue::Int(1),
            CellValue::Int(2),
            CellValue::Int(3),
            CellValue::Int(4),
        ],
    ]);
    sheet.name_columns_by_header().unwrap();

    assert_eq!(
        sheet.column_names().unwrap(),
        &vec![
            "monto".to_string(),
            "Unnamed: 1".to_string(),
            "monto.1".to_string(),
            "monto.2".to_string()
        ]
    );
}

#[test]
fn test_by_name_access_requires_names() {
    let sheet = Sheet::from_data(vec![vec!["a"], vec!["b"]]);

    assert!(matches!(
        sheet.column_by_name("a"),
        Err(SheetError::NoHeader(_))
    ));
}

#[test]
fn test_unknown_column_name() {
    let mut sheet = Sheet::from_data(vec![vec!["a"], vec!["b"]]);
    sheet.name_columns_by_row(0).unwrap();

    assert!(matches!(
        sheet.column_by_name("z"),
        Err(SheetError::UnknownColumn { .. })
    ));
}

#[test]
fn test_duplicate_names_rejected_by_row_naming() {
    let mut sheet = Sheet::from_data(vec![vec!["a", "a"]]);

    assert!(matches!(
        sheet.name_columns_by_row(0),
        Err(SheetError::DuplicateHeader { .. })
    ));
}

// ===== File Round Trips =====

#[test]
fn test_csv_file_round_trip_keeps_text_amounts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ventas.csv");
    std::fs::write(&path, "producto,precio\nmate,\"$ 1.234,56\"\nbombilla,3\n").unwrap();

    let sheet =
        Sheet::from_csv_with_options(&path, &CsvOptions::default().with_headers(true)).unwrap();

    assert_eq!(
        sheet.get_by_name(1, "precio").unwrap(),
        &CellValue::from("$ 1.234,56")
    );
    assert_eq!(sheet.get_by_name(2, "precio").unwrap(), &CellValue::Int(3));

    let out = dir.path().join("copia.csv");
    sheet.save_as_csv(&out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, "producto,precio\nmate,\"$ 1.234,56\"\nbombilla,3\n");
}

#[test]
fn test_tsv_short_rows_are_padded() {
    let sheet = Sheet::from_csv_str("a\tb\tc\n1\t2\n", &CsvOptions::tsv()).unwrap();

    assert_eq!(sheet.col_count(), 3);
    assert!(sheet.get(1, 2).unwrap().is_null());
}

#[test]
fn test_xlsx_round_trip_with_formats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("formatos.xlsx");
    let fecha = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut sheet = Sheet::from_data(vec![
        vec![
            CellValue::from("Fecha"),
            CellValue::from("Operacion ID"),
            CellValue::from("Monto"),
        ],
        vec![
            CellValue::DateTime(fecha),
            CellValue::Float(123.0),
            CellValue::Float(-1500.5),
        ],
    ]);
    sheet.name_columns_by_row(0).unwrap();

    let options = XlsxWriteOptions::default()
        .with_header_style(Some(40.0))
        .with_default_column_width(20.0)
        .with_column(0, ColumnFormat::default().with_num_format("yyyy-mm-dd"))
        .with_column(
            1,
            ColumnFormat::default()
                .with_num_format("0")
                .with_left_align()
                .with_width(15.0),
        )
        .with_column(2, ColumnFormat::default().with_num_format("$ #,##0.00"));
    sheet.save_as_xlsx_with_options(&path, &options).unwrap();

    let loaded =
        Sheet::from_excel_with_options(&path, &ExcelReadOptions::default().with_headers(true))
            .unwrap();

    assert_eq!(loaded.get_by_name(1, "Fecha").unwrap(), &CellValue::DateTime(fecha));
    assert_eq!(
        loaded.get_by_name(1, "Operacion ID").unwrap().as_number(),
        Some(123.0)
    );
    assert_eq!(
        loaded.get_by_name(1, "Monto").unwrap().as_number(),
        Some(-1500.5)
    );
}

#[test]
fn test_xlsx_buffer_reads_back() {
    let sheet = Sheet::from_data(vec![vec!["words"], vec!["one"], vec!["two"]]);

    let bytes = sheet.to_xlsx_buffer(&XlsxWriteOptions::default()).unwrap();
    assert!(bytes.starts_with(b"PK\x03\x04"));

    let loaded = Sheet::from_excel_bytes(&bytes, &ExcelReadOptions::default()).unwrap();
    assert_eq!(loaded.row_count(), 3);
    assert_eq!(loaded.get(2, 0).unwrap(), &CellValue::from("two"));
}
