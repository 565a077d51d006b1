use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories searched for the native gdbm libraries, in order.
const LIB_DIRS: &[&str] = &[
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    "/lib/x86_64-linux-gnu",
    "/lib/aarch64-linux-gnu",
    "/usr/lib64",
    "/usr/lib",
    "/lib64",
    "/lib",
    "/usr/local/lib",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "linux" {
        // macOS and the BSDs ship the dbm_* entry points in the system C
        // library, so there is nothing to link explicitly.
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    for name in ["gdbm_compat", "gdbm"] {
        match locate(name, &out_dir) {
            Some(search_dir) => {
                println!("cargo:rustc-link-search=native={}", search_dir.display());
                println!("cargo:rustc-link-lib=dylib={}", name);
            }
            None => panic!(
                "lib{}.so not found; install gdbm (e.g. libgdbm-compat-dev) \
                 or place the library in a standard directory",
                name
            ),
        }
    }
}

/// Find `lib<name>.so`, returning the directory to add to the link search
/// path. Distributions without the -dev package only install versioned
/// sonames (`lib<name>.so.N`); in that case symlink one into OUT_DIR under
/// the unversioned name the linker expects.
fn locate(name: &str, out_dir: &Path) -> Option<PathBuf> {
    let unversioned = format!("lib{}.so", name);

    for dir in LIB_DIRS {
        let dir = Path::new(dir);
        if dir.join(&unversioned).exists() {
            return Some(dir.to_path_buf());
        }
    }

    let prefix = format!("lib{}.so.", name);
    for dir in LIB_DIRS {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !file_name.starts_with(&prefix) {
                continue;
            }
            let link = out_dir.join(&unversioned);
            if !link.exists() {
                #[cfg(unix)]
                std::os::unix::fs::symlink(entry.path(), &link).ok()?;
            }
            return Some(out_dir.to_path_buf());
        }
    }

    None
}
