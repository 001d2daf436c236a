//! End-to-end page generation over a temporary page tree.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use multipage::{
    AssetOutputs, BuildOptions, DocumentCache, PAGE_MAP_FILE, PageGenerator, PagesConfig,
    RecordingHost, Selector, SharedChunkConfig,
};

const TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
  <meta charset=\"UTF-8\">
  <link rel=\"stylesheet\" href=\"common.css\">
  <!--[if lt IE 9]><script src=\"html5shiv.js\"></script><![endif]-->
</head>
<body>
  <div id=\"app\"></div>
  <!--SCRIPT-->
</body>
</html>
";

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    for page in ["home", "about", "shared"] {
        fs::create_dir_all(dir.path().join("pages").join(page)).unwrap();
    }
    fs::write(dir.path().join("template.html"), TEMPLATE).unwrap();
    dir
}

fn config(root: &Path) -> PagesConfig {
    PagesConfig {
        template: Some(Selector::Literal(root.join("template.html"))),
        exclude: vec!["shared".to_string()],
        pre_entries: vec!["./polyfills".to_string()],
        shared_chunk: Some(SharedChunkConfig::new("common")),
        page_map: true,
        ..Default::default()
    }
}

fn build(dir: &TempDir, options: &BuildOptions) -> (RecordingHost, AssetOutputs) {
    let mut generator =
        PageGenerator::new(dir.path().join("pages"), config(dir.path())).unwrap();
    let mut host = RecordingHost::default();
    generator.register(&mut host).unwrap();

    let mut assets = AssetOutputs::new();
    for request in &host.html {
        let html = generator
            .render_page(request, &request.chunks, options)
            .unwrap();
        assets.insert(request.filename.clone(), html);
    }
    generator.finalize(options, &mut assets).unwrap();
    (host, assets)
}

fn page(assets: &AssetOutputs, name: &str) -> String {
    String::from_utf8(assets.get(name).unwrap().to_vec()).unwrap()
}

#[test]
fn test_default_entry_is_the_page_directory() {
    let dir = site();
    let (host, _) = build(&dir, &BuildOptions::default());

    let home_dir = dir.path().join("pages").join("home");
    assert_eq!(
        host.entries["home"],
        ["./polyfills".to_string(), format!("{}/", home_dir.display())]
    );
    assert!(!host.entries.contains_key("shared"));
    assert_eq!(host.shared_chunks[0].chunks, ["about", "home"]);
}

#[test]
fn test_production_build() {
    let dir = site();
    let options = BuildOptions {
        production: true,
        styles_extracted: true,
        public_path: "/static/".to_string(),
    };
    let (_, assets) = build(&dir, &options);

    assert_eq!(
        page(&assets, "home.html"),
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\">\
         <link rel=\"stylesheet\" href=\"common.css\">\
         <!--[if lt IE 9]><script src=\"html5shiv.js\"></script><![endif]-->\
         <link rel=\"stylesheet\" href=\"home\"></head>\
         <body><div id=\"app\"></div>\
         <script src=\"common\"></script><script src=\"home\"></script></body></html>"
    );

    let map: serde_json::Value =
        serde_json::from_slice(assets.get(PAGE_MAP_FILE).unwrap()).unwrap();
    assert_eq!(map["home"], "/static/home.html");
    assert_eq!(map["about"], "/static/about.html");
}

#[test]
fn test_development_build_keeps_template_layout() {
    let dir = site();
    let (_, assets) = build(&dir, &BuildOptions::default());
    let about = page(&assets, "about.html");

    // Injected scripts replace the marker on its own line
    assert!(about.contains(
        "<div id=\"app\"></div>\n  <script src=\"common\"></script>\n<script src=\"about\"></script>\n"
    ));
    assert!(about.contains("<meta charset=\"UTF-8\">\n  <link rel=\"stylesheet\" href=\"common.css\">"));
    assert!(!about.contains("<!--SCRIPT-->"));
    // Styles are inlined by the bundler when not extracted
    assert!(!about.contains("href=\"about\""));
}

#[test]
fn test_pages_sharing_a_template_are_independent() {
    let dir = site();
    let (_, assets) = build(&dir, &BuildOptions::default());

    let home = page(&assets, "home.html");
    let about = page(&assets, "about.html");
    assert!(home.contains("src=\"home\"") && !home.contains("src=\"about\""));
    assert!(about.contains("src=\"about\"") && !about.contains("src=\"home\""));

    let mut cache = DocumentCache::new();
    let template = dir.path().join("template.html");
    let mut first = cache.document(Some(template.as_path())).unwrap();
    let second = cache.document(Some(template.as_path())).unwrap();
    first.ensure_requires(&["extra"], false).unwrap();
    assert_eq!(first.scripts().len(), 1);
    assert!(second.scripts().is_empty());
}

#[test]
fn test_assets_written_to_output_dir() {
    let dir = site();
    let (_, assets) = build(&dir, &BuildOptions::default());
    let out = dir.path().join("dist");

    assets.write_to(&out).unwrap();

    assert!(out.join("home.html").is_file());
    assert!(out.join("about.html").is_file());
    let map = fs::read_to_string(out.join(PAGE_MAP_FILE)).unwrap();
    assert_eq!(map, r#"{"about":"about.html","home":"home.html"}"#);
}
