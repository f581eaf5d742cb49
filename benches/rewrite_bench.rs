// benches/rewrite_bench.rs
//! Benchmarks for path resolution and reference rewriting.

use confluence2md::{rewrite, Ancestor, Page, PageId, PathMap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A space of `sections` top-level pages, each with `per_section` children.
fn create_space(sections: usize, per_section: usize) -> Vec<Page> {
    let mut pages = Vec::with_capacity(sections * (per_section + 1));
    let mut next_id = 1u64;

    for s in 0..sections {
        let section_title = format!("Section {}", s);
        let section_id = PageId::parse(&next_id.to_string()).unwrap();
        next_id += 1;
        pages.push(Page::new(section_id.clone(), section_title.clone(), Vec::new()));

        for c in 0..per_section {
            let id = PageId::parse(&next_id.to_string()).unwrap();
            next_id += 1;
            // Every third child repeats a title to exercise disambiguation.
            let title = if c % 3 == 0 {
                "Meeting notes".to_string()
            } else {
                format!("Page {}/{}", s, c)
            };
            pages.push(Page::new(
                id,
                title,
                vec![Ancestor {
                    id: Some(section_id.clone()),
                    title: Some(section_title.clone()),
                }],
            ));
        }
    }

    pages
}

fn create_body(links: usize, total_pages: usize) -> String {
    let mut body = String::from("<h1>Overview</h1>");
    for i in 0..links {
        let target = (i * 7) % total_pages + 1;
        body.push_str(&format!(
            "<p>See <ac:link><ri:page ri:page-id=\"{}\"/></ac:link> and \
             <a href=\"/wiki/pages/viewpage.action?pageId={}\">this</a>.</p>\
             <ac:image ac:alt=\"fig {}\"><ri:attachment ri:filename=\"fig {}.png\"/></ac:image>\
             <ac:structured-macro ac:name=\"info\"><ac:rich-text-body><p>Note {}</p></ac:rich-text-body></ac:structured-macro>",
            target, target, i, i, i
        ));
    }
    body
}

fn bench_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");

    for &(sections, per_section) in &[(10, 10), (50, 40), (100, 100)] {
        let pages = create_space(sections, per_section);
        group.bench_with_input(BenchmarkId::from_parameter(pages.len()), &pages, |b, pages| {
            b.iter(|| PathMap::resolve(black_box(pages)))
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let pages = create_space(20, 25);
    let paths = PathMap::resolve(&pages);
    let owner = pages[1].id.clone();

    let mut group = c.benchmark_group("rewrite");
    for &links in &[10, 100, 1000] {
        let body = create_body(links, pages.len());
        group.bench_with_input(BenchmarkId::from_parameter(links), &body, |b, body| {
            b.iter(|| rewrite(black_box(body), &owner, &paths, "_attachments/2"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_path_resolution, bench_rewrite);
criterion_main!(benches);
