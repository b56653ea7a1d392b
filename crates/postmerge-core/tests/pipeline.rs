use postmerge_core::{
    merge, read_file_sets, scan_directory, ExportFormat, ExportOptions, Row, Session,
    SessionState, SourceMapping, Table, PLACEHOLDER,
};
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::tempdir;
use zip::ZipArchive;

fn mapping(entries: &[(&str, &str)]) -> SourceMapping {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn assert_table_properties(urls: &SourceMapping, captions: &SourceMapping, table: &Table) {
    let keys: BTreeSet<&String> = urls.keys().chain(captions.keys()).collect();
    assert_eq!(table.row_count(), keys.len());

    for pair in table.rows.windows(2) {
        assert!(pair[0].identifier <= pair[1].identifier);
    }

    for row in table {
        match (urls.get(&row.identifier), captions.get(&row.identifier)) {
            (Some(u), Some(c)) => {
                assert_eq!(&row.url, u);
                assert_eq!(&row.caption, c);
            }
            (Some(u), None) => {
                assert_eq!(&row.url, u);
                assert_eq!(row.caption, PLACEHOLDER);
            }
            (None, Some(c)) => {
                assert_eq!(row.url, PLACEHOLDER);
                assert_eq!(&row.caption, c);
            }
            (None, None) => panic!("row {} has no source", row.identifier),
        }
    }
}

#[test]
fn scenario_a_matched_identifier() {
    let table = merge(
        &mapping(&[("2024-01-01", "http://a")]),
        &mapping(&[("2024-01-01", "Hello")]),
    );
    assert_eq!(table.rows, vec![Row::new("2024-01-01", "http://a", "Hello")]);
}

#[test]
fn scenario_b_url_without_caption() {
    let table = merge(&mapping(&[("2024-01-02", "http://b")]), &SourceMapping::new());
    assert_eq!(table.rows, vec![Row::new("2024-01-02", "http://b", "-")]);
}

#[test]
fn scenario_c_caption_without_url() {
    let table = merge(
        &SourceMapping::new(),
        &mapping(&[("2024-01-03", "Caption only")]),
    );
    assert_eq!(table.rows, vec![Row::new("2024-01-03", "-", "Caption only")]);
}

#[test]
fn scenario_d_sorted_not_insertion_order() {
    let table = merge(&mapping(&[("b", "u2"), ("a", "u1")]), &SourceMapping::new());
    assert_eq!(
        table.rows,
        vec![Row::new("a", "u1", "-"), Row::new("b", "u2", "-")]
    );
}

#[test]
fn scenario_e_export_of_empty_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("postingan.xlsx");

    let result = Session::new().export(&path, ExportFormat::Xlsx, &ExportOptions::default());

    assert!(result.unwrap_err().is_notice());
    assert!(!path.exists());
}

#[test]
fn merge_properties_hold_for_overlapping_sets() {
    let urls = mapping(&[
        ("2024-02-01", "http://1"),
        ("2024-02-03", "http://3"),
        ("2024-02-10", "http://10"),
        ("a", "x"),
    ]);
    let captions = mapping(&[
        ("2024-02-03", "three"),
        ("2024-02-04", "four"),
        ("Z", "upper"),
    ]);

    let table = merge(&urls, &captions);

    assert_table_properties(&urls, &captions, &table);
    assert_eq!(table, merge(&urls, &captions));
}

#[tokio::test]
async fn directories_to_workbook() {
    let urls_dir = tempdir().unwrap();
    let captions_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();

    write_files(
        urls_dir.path(),
        &[
            ("2024-05-02.txt", "https://example.com/p/2/\n"),
            ("2024-05-01.txt", "https://example.com/p/1/"),
            ("readme.md", "ignored"),
        ],
    );
    write_files(
        captions_dir.path(),
        &[
            ("2024-05-01.txt", "  First post\nwith two lines  "),
            ("2024-05-03.txt", "Third"),
        ],
    );

    let urls = scan_directory(urls_dir.path()).unwrap().into_files();
    let captions = scan_directory(captions_dir.path()).unwrap().into_files();

    let (url_map, caption_map) = read_file_sets(&urls, &captions).await.unwrap();
    assert_eq!(caption_map["2024-05-01"], "First post\nwith two lines");

    let mut session = Session::new();
    session.select_urls(urls);
    session.select_captions(captions);
    let table = session.process().await.unwrap().clone();

    assert_table_properties(&url_map, &caption_map, &table);
    assert_eq!(
        table.rows,
        vec![
            Row::new(
                "2024-05-01",
                "https://example.com/p/1/",
                "First post\nwith two lines"
            ),
            Row::new("2024-05-02", "https://example.com/p/2/", "-"),
            Row::new("2024-05-03", "-", "Third"),
        ]
    );

    let path = out_dir.path().join("postingan.xlsx");
    session
        .export(&path, ExportFormat::Xlsx, &ExportOptions::default())
        .unwrap();
    assert_eq!(session.state(), SessionState::TableReady);

    let mut archive = ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
    let mut workbook = String::new();
    archive
        .by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut workbook)
        .unwrap();
    assert!(workbook.contains("name=\"Postingan\""));

    let mut strings = String::new();
    archive
        .by_name("xl/sharedStrings.xml")
        .unwrap()
        .read_to_string(&mut strings)
        .unwrap();
    for text in ["identifier", "https://example.com/p/2/", "Third"] {
        assert!(strings.contains(text), "missing cell text {text}");
    }
}

#[tokio::test]
async fn unreadable_file_aborts_run() {
    let urls_dir = tempdir().unwrap();
    let captions_dir = tempdir().unwrap();
    write_files(urls_dir.path(), &[("a.txt", "http://a")]);
    fs::write(captions_dir.path().join("a.txt"), [0xffu8, 0xfe]).unwrap();

    let mut session = Session::new();
    session.select_urls(scan_directory(urls_dir.path()).unwrap().into_files());
    session.select_captions(scan_directory(captions_dir.path()).unwrap().into_files());

    assert!(session.process().await.is_err());
    assert_eq!(session.state(), SessionState::Failed);
    assert!(session.table().is_none());
}
