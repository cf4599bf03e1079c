use chrono::{TimeZone, Utc};
use clap::Parser;
use shellview::engine::{
    Cli, ViewMode, explorer_order, glob_match, is_os_hidden_file, kinds_for_mode, list_dir,
    parse_column, setup_opts, should_list,
};
use shellview::service::format::{
    column_text, display_name, format_size, format_timestamp, join_info_tip, modified_info_tip,
};
use shellview::service::fs::type_description;
use shellview::service::read_item;
use shellview::utils::{SettingsToml, apply_settings_to_config};
use shellview::{
    ColumnType, FsMetadataService, IconPayload, InfoTipType, Item, ItemAttributes, JobKind,
    MetadataService, PoolConfig, SizeDisplay, TaskLane, ViewConfig,
};
use std::path::PathBuf;

fn file_item(name: &str, size: u64) -> Item {
    Item::new(format!("/data/{name}"), ItemAttributes::empty(), size, None)
}

fn dir_item(name: &str) -> Item {
    Item::new(format!("/data/{name}"), ItemAttributes::DIRECTORY, 0, None)
}

// --- format_size ---

#[test]
fn test_format_size_auto() {
    assert_eq!(format_size(&file_item("a", 0), SizeDisplay::Auto), "0 bytes");
    assert_eq!(format_size(&file_item("a", 1023), SizeDisplay::Auto), "1023 bytes");
    assert_eq!(format_size(&file_item("a", 1536), SizeDisplay::Auto), "1.5 KB");
    assert_eq!(
        format_size(&file_item("a", 5 * 1024 * 1024), SizeDisplay::Auto),
        "5.0 MB"
    );
}

#[test]
fn test_format_size_bytes_grouped() {
    assert_eq!(format_size(&file_item("a", 999), SizeDisplay::Bytes), "999 bytes");
    assert_eq!(
        format_size(&file_item("a", 1_234_567), SizeDisplay::Bytes),
        "1,234,567 bytes"
    );
}

#[test]
fn test_format_size_directory_blank() {
    assert_eq!(format_size(&dir_item("docs"), SizeDisplay::Auto), "");
}

#[test]
fn test_size_halves() {
    let item = file_item("big", (3u64 << 32) | 7);
    assert_eq!(item.size_high(), 3);
    assert_eq!(item.size_low(), 7);
}

// --- format_timestamp ---

#[test]
fn test_format_timestamp_friendly_today_and_yesterday() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
    let today = Utc.with_ymd_and_hms(2024, 3, 10, 9, 5, 0).unwrap();
    let yesterday = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
    let older = Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap();
    assert_eq!(format_timestamp(&today, &now, true, "%Y-%m-%d"), "Today, 09:05");
    assert_eq!(
        format_timestamp(&yesterday, &now, true, "%Y-%m-%d"),
        "Yesterday, 23:59"
    );
    assert_eq!(
        format_timestamp(&older, &now, true, "%Y-%m-%d %H:%M"),
        "2024-01-02 08:30"
    );
}

#[test]
fn test_format_timestamp_plain() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
    assert_eq!(format_timestamp(&now, &now, false, "%d/%m/%Y"), "10/03/2024");
}

// --- names and columns ---

#[test]
fn test_display_name_hides_extension() {
    assert_eq!(display_name(&file_item("report.pdf", 1), false), "report");
    assert_eq!(display_name(&file_item("report.pdf", 1), true), "report.pdf");
    assert_eq!(display_name(&file_item(".bashrc", 1), false), ".bashrc");
    assert_eq!(display_name(&dir_item("v1.2"), false), "v1.2");
}

#[test]
fn test_column_text() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
    let config = ViewConfig::default();
    let mut item = file_item("photo.JPG", 2048);
    assert_eq!(
        column_text(&item, ColumnType::Extension, &config, &now).as_deref(),
        Some("JPG")
    );
    assert_eq!(
        column_text(&item, ColumnType::Attributes, &config, &now).as_deref(),
        Some("----")
    );
    assert_eq!(column_text(&item, ColumnType::Type, &config, &now), None);
    assert_eq!(column_text(&item, ColumnType::DateModified, &config, &now), None);

    item.last_write_time = Some(Utc.with_ymd_and_hms(2024, 3, 10, 11, 15, 0).unwrap());
    assert_eq!(
        column_text(&item, ColumnType::DateModified, &config, &now).as_deref(),
        Some("Today, 11:15")
    );
}

#[test]
fn test_modified_info_tip() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
    let config = ViewConfig {
        show_friendly_dates: false,
        ..ViewConfig::default()
    };
    let mut item = file_item("a.txt", 1);
    assert_eq!(modified_info_tip(&item, &config, &now), None);
    item.last_write_time = Some(Utc.with_ymd_and_hms(2023, 12, 1, 6, 0, 0).unwrap());
    assert_eq!(
        modified_info_tip(&item, &config, &now).as_deref(),
        Some("Date modified: 2023-12-01 06:00")
    );
}

#[test]
fn test_join_info_tip() {
    assert_eq!(join_info_tip(Some("long na…"), "Type: File".into()), "long na…\nType: File");
    assert_eq!(join_info_tip(Some(""), "Type: File".into()), "Type: File");
    assert_eq!(join_info_tip(None, "Type: File".into()), "Type: File");
}

#[test]
fn test_type_description() {
    assert_eq!(type_description(&dir_item("docs")), "File folder");
    assert_eq!(type_description(&file_item("a.png", 1)), "PNG File");
    assert_eq!(type_description(&file_item("Makefile", 1)), "File");
}

#[test]
fn test_attribute_flags() {
    let attrs = ItemAttributes::DIRECTORY | ItemAttributes::LINK;
    assert_eq!(attrs.flag_string(), "D-L-");
}

// --- glob_match / should_list ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("node_modules", "node_modules"));
    assert!(!glob_match("node_modules", "node_module"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("file?.txt", "file1.txt"));
    assert!(!glob_match("file?.txt", "file10.txt"));
}

#[test]
fn test_glob_match_negation_stripped() {
    assert!(glob_match("!node_modules", "node_modules"));
}

#[test]
fn test_os_hidden_files() {
    assert!(is_os_hidden_file(&PathBuf::from("/x/.DS_Store")));
    assert!(is_os_hidden_file(&PathBuf::from("/x/Thumbs.db")));
    assert!(is_os_hidden_file(&PathBuf::from("/x/._resource")));
    assert!(!is_os_hidden_file(&PathBuf::from("/x/notes.txt")));
}

#[test]
fn test_should_list_exclude_patterns() {
    let patterns = vec!["*.tmp".to_string(), "build".to_string()];
    assert!(!should_list(&PathBuf::from("/p/a.tmp"), &patterns));
    assert!(!should_list(&PathBuf::from("/p/build"), &patterns));
    assert!(should_list(&PathBuf::from("/p/src"), &patterns));
    assert!(!should_list(&PathBuf::from("/p/.DS_Store"), &[]));
}

// --- CLI helpers ---

#[test]
fn test_parse_column() {
    assert_eq!(parse_column("name"), Ok(ColumnType::Name));
    assert_eq!(parse_column("Date-Modified"), Ok(ColumnType::DateModified));
    assert_eq!(parse_column(" ext "), Ok(ColumnType::Extension));
    assert!(parse_column("owner").is_err());
}

#[test]
fn test_kinds_for_mode() {
    let cols = [ColumnType::Name, ColumnType::Size];
    assert_eq!(
        kinds_for_mode(ViewMode::Details, &cols, false),
        vec![
            JobKind::Icon,
            JobKind::Column(ColumnType::Name),
            JobKind::Column(ColumnType::Size)
        ]
    );
    assert_eq!(
        kinds_for_mode(ViewMode::Thumbnails, &cols, true),
        vec![JobKind::Icon, JobKind::Thumbnail, JobKind::InfoTip]
    );
    assert_eq!(kinds_for_mode(ViewMode::Icons, &cols, false), vec![JobKind::Icon]);
}

#[test]
fn test_explorer_order_folders_first() {
    let mut items = vec![
        file_item("b.txt", 1),
        dir_item("Zoo"),
        file_item("A.txt", 1),
        dir_item("apps"),
    ];
    items.sort_by(explorer_order);
    let names: Vec<_> = items.iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, vec!["apps", "Zoo", "A.txt", "b.txt"]);
}

// --- settings file ---

#[test]
fn test_settings_toml_applies_present_values() {
    let file = SettingsToml::parse(
        r#"
[view]
mode = "thumbnails"
columns = ["name", "date_modified"]
thumbnail_size = 64
info_tip_type = "modified_date"
size_display = "bytes"

[workers]
icon_threads = 0
thumbnail_cache = 5
"#,
    )
    .unwrap();
    assert_eq!(file.view_mode(), Some(ViewMode::Thumbnails));
    assert_eq!(
        file.columns(),
        Some(&[ColumnType::Name, ColumnType::DateModified][..])
    );

    let mut view = ViewConfig::default();
    let mut pool = PoolConfig::tuned();
    let column_threads = pool.column.threads;
    apply_settings_to_config(&file, &mut view, &mut pool);
    assert_eq!(view.thumbnail_size, 64);
    assert_eq!(view.info_tip_type, InfoTipType::ModifiedDate);
    assert_eq!(view.size_display, SizeDisplay::Bytes);
    assert!(view.show_info_tips);
    assert_eq!(pool.lane(TaskLane::Icon).threads, 1);
    assert_eq!(pool.column.threads, column_threads);
    assert_eq!(pool.thumbnail_cache_cap, 5);
}

#[test]
fn test_settings_toml_empty_and_malformed() {
    let empty = SettingsToml::parse("").unwrap();
    assert_eq!(empty.view_mode(), None);
    assert!(SettingsToml::parse("[view]\nthumbnail_size = \"big\"").is_err());
}

#[test]
fn test_date_info_tips_flag_overrides_settings_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    std::fs::write(
        tmp.path().join(".shellview.toml"),
        "[view]\ninfo_tip_type = \"modified_date\"\n",
    )?;
    let dir = tmp.path().to_string_lossy().into_owned();

    let from_file = setup_opts(&Cli::parse_from(["shellview", dir.as_str()]));
    assert_eq!(from_file.view.info_tip_type, InfoTipType::ModifiedDate);

    let off = Cli::parse_from(["shellview", dir.as_str(), "--date-info-tips", "false"]);
    assert_eq!(setup_opts(&off).view.info_tip_type, InfoTipType::System);

    let on = Cli::parse_from(["shellview", dir.as_str(), "--date-info-tips"]);
    assert_eq!(setup_opts(&on).view.info_tip_type, InfoTipType::ModifiedDate);
    Ok(())
}

// --- filesystem service ---

#[test]
fn test_read_item_file_and_dir() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("notes.txt");
    std::fs::write(&path, "hello")?;
    std::fs::create_dir(tmp.path().join("sub"))?;

    let item = read_item(&path)?;
    assert_eq!(item.display_name, "notes.txt");
    assert_eq!(item.size, 5);
    assert!(!item.is_dir());
    assert!(item.last_write_time.is_some());

    let sub = read_item(&tmp.path().join("sub"))?;
    assert!(sub.is_dir());
    assert!(read_item(&tmp.path().join("missing")).is_err());
    Ok(())
}

#[test]
fn test_fs_service_icons() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.rs", "plain"] {
        std::fs::write(tmp.path().join(name), "x").unwrap();
    }
    let service = FsMetadataService::new();
    let icon = |name: &str| {
        let item = read_item(&tmp.path().join(name)).unwrap();
        service.fetch_icon(&item.identity).unwrap()
    };
    let dir_item = read_item(tmp.path()).unwrap();
    assert_eq!(service.fetch_icon(&dir_item.identity).unwrap(), IconPayload::plain(3));
    assert_eq!(icon("plain"), IconPayload::plain(0));
    assert_eq!(icon("a.txt"), icon("b.txt"));
    assert_ne!(icon("a.txt"), icon("c.rs"));
    assert!(icon("a.txt").index >= 10);
}

#[test]
fn test_fs_service_thumbnail_keeps_aspect() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("wide.png");
    image::RgbaImage::from_pixel(300, 150, image::Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();

    let service = FsMetadataService::new();
    let item = read_item(&path).unwrap();
    let thumb = service.fetch_thumbnail(&item.identity, 120).unwrap();
    assert_eq!((thumb.width, thumb.height), (120, 60));
    assert_eq!(thumb.rgba.len(), 120 * 60 * 4);

    let dir = read_item(tmp.path()).unwrap();
    assert!(service.fetch_thumbnail(&dir.identity, 120).is_err());
}

#[test]
fn test_fs_service_type_column_and_info_tip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("data.csv");
    std::fs::write(&path, "a,b\n")?;
    let service = FsMetadataService::new();
    let item = read_item(&path)?;
    assert_eq!(
        service.fetch_column_value(&item.identity, ColumnType::Type)?,
        "CSV File"
    );
    assert!(service
        .fetch_column_value(&item.identity, ColumnType::Size)
        .is_err());
    let tip = service.fetch_info_tip(&item.identity)?;
    assert!(tip.starts_with("Type: CSV File\nSize: 4 bytes"));
    assert!(tip.contains("Date modified: "));
    Ok(())
}

// --- listing ---

#[test]
fn test_list_dir_skips_hidden_and_excluded() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["keep.txt", ".secret", "skip.tmp", ".DS_Store"] {
        std::fs::write(tmp.path().join(name), "x").unwrap();
    }
    std::fs::create_dir(tmp.path().join("folder")).unwrap();

    let exclude = vec!["*.tmp".to_string()];
    let mut names: Vec<String> = list_dir(tmp.path(), &exclude, false)
        .unwrap()
        .into_iter()
        .map(|i| i.display_name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["folder", "keep.txt"]);

    let with_hidden = list_dir(tmp.path(), &exclude, true).unwrap();
    assert!(with_hidden.iter().any(|i| i.display_name == ".secret"));
    assert!(list_dir(&tmp.path().join("keep.txt"), &[], false).is_err());
}
