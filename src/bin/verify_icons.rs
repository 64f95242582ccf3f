use extension_logo::{
    icon_writer::DEFAULT_SIZES,
    verify::{inspect_icon_dir, parse_sizes},
};
use std::path::PathBuf;
use std::process::ExitCode;

// Usage: verify_icons [DIR] [SIZES], e.g. `verify_icons icons 16,48,128`
fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("icons"));
    let sizes = match args.next() {
        Some(list) => match parse_sizes(&list) {
            Ok(sizes) => sizes,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_SIZES.to_vec(),
    };

    println!("Checking icons in: {} (sizes {sizes:?})", dir.display());

    let mut failures = 0;
    for (size, result) in inspect_icon_dir(&dir, &sizes) {
        match result {
            Ok(report) if report.is_valid_icon(size) => {
                println!("  ✓ icon{size}.png: {}x{} {:?}", report.width, report.height, report.color);
            }
            Ok(report) => {
                failures += 1;
                println!(
                    "  ⚠ icon{size}.png: {}x{} {:?} opaque={} (expected {size}x{size} opaque RGB)",
                    report.width, report.height, report.color, report.opaque
                );
            }
            Err(e) => {
                failures += 1;
                println!("  ⚠ icon{size}.png: {e}");
            }
        }
    }

    if failures == 0 {
        println!("✓ All icons look good!");
        ExitCode::SUCCESS
    } else {
        println!("⚠ {failures} icon(s) need attention");
        ExitCode::FAILURE
    }
}
