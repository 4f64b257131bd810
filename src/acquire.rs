use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;

/// Pinned mado release. Bumping this invalidates nothing on disk, so delete
/// the cached binary under `benchmark/.tools/` when changing it.
pub const MADO_VERSION: &str = "v0.3.0";

const BINARY_NAME: &str = "mado";

/// Canonical cache path of the acquired binary.
pub fn cache_path(tools_dir: &Path) -> PathBuf {
    tools_dir.join(BINARY_NAME)
}

/// OS family token used in mado release asset names.
fn os_token() -> &'static str {
    if cfg!(target_os = "macos") {
        "macOS"
    } else if cfg!(target_os = "linux") {
        "Linux-gnu"
    } else {
        "Windows-msvc"
    }
}

fn arch_token() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "x86_64"
    }
}

/// Release asset name for the current platform. Windows releases ship as
/// zip archives; everything else as gzipped tarballs.
pub fn release_asset_name() -> String {
    let ext = if cfg!(target_os = "windows") {
        "zip"
    } else {
        "tar.gz"
    };
    format!("mado-{}-{}.{}", os_token(), arch_token(), ext)
}

fn release_url(asset: &str) -> String {
    format!("https://github.com/akiomik/mado/releases/download/{MADO_VERSION}/{asset}")
}

/// Make the mado binary present at its cache path, downloading on first use.
///
/// Idempotent: an existing cache file is trusted as-is (no checksum is
/// recomputed). The archive is fetched to a temporary path inside the cache
/// directory and removed again whether or not extraction succeeds, so an
/// aborted run never leaves a half-written binary at the canonical path.
///
/// # Errors
///
/// Network, HTTP-status, missing-entry and filesystem failures all surface
/// as errors; the prober degrades the tool to unavailable instead of
/// aborting the run.
pub fn ensure_binary(tools_dir: &Path) -> Result<PathBuf> {
    let bin_path = cache_path(tools_dir);
    if bin_path.exists() {
        return Ok(bin_path);
    }

    let asset = release_asset_name();
    let url = release_url(&asset);
    println!("   Downloading mado {MADO_VERSION} from {url}...");

    fs::create_dir_all(tools_dir)
        .with_context(|| format!("failed to create {}", tools_dir.display()))?;

    let archive_path = tools_dir.join(&asset);
    let outcome = download(&url, &archive_path).and_then(|()| {
        ReleaseArchive::from_name(&asset).extract_tool(&archive_path, &bin_path)
    });
    let _ = fs::remove_file(&archive_path);
    outcome?;

    set_executable(&bin_path)?;
    Ok(bin_path)
}

fn download(url: &str, dest: &Path) -> Result<()> {
    let mut response =
        reqwest::blocking::get(url).with_context(|| format!("failed to fetch {url}"))?;
    if !response.status().is_success() {
        bail!("{url} returned {}", response.status());
    }
    let mut file = fs::File::create(dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;
    response
        .copy_to(&mut file)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}

/// Release archive format, sniffed from the asset file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseArchive {
    TarGz,
    Zip,
}

impl ReleaseArchive {
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(".zip") {
            ReleaseArchive::Zip
        } else {
            ReleaseArchive::TarGz
        }
    }

    /// Extract the single `mado` entry from `archive` into `dest`.
    /// The first matching entry wins; further matches are not trusted.
    pub fn extract_tool(self, archive: &Path, dest: &Path) -> Result<()> {
        match self {
            ReleaseArchive::TarGz => extract_from_tar_gz(archive, dest),
            ReleaseArchive::Zip => extract_from_zip(archive, dest),
        }
    }
}

fn is_tar_tool_entry(name: &str) -> bool {
    name == BINARY_NAME || name.ends_with("/mado")
}

fn is_zip_tool_entry(name: &str) -> bool {
    name.ends_with("/mado") || name.ends_with("/mado.exe")
}

fn extract_from_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive)
        .with_context(|| format!("failed to open {}", archive.display()))?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    for entry in tar.entries().context("failed to read tar archive")? {
        let mut entry = entry.context("failed to read tar entry")?;
        let name = entry.path().context("invalid tar entry path")?.to_string_lossy().into_owned();
        if is_tar_tool_entry(&name) {
            let mut out = fs::File::create(dest)
                .with_context(|| format!("failed to create {}", dest.display()))?;
            std::io::copy(&mut entry, &mut out)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            return Ok(());
        }
    }

    bail!("could not find mado binary in {}", archive.display())
}

fn extract_from_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive)
        .with_context(|| format!("failed to open {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file).context("failed to read zip archive")?;

    let entry_name = zip
        .file_names()
        .find(|name| is_zip_tool_entry(name))
        .map(str::to_owned);
    let Some(entry_name) = entry_name else {
        bail!("could not find mado binary in {}", archive.display());
    };

    let mut entry = zip
        .by_name(&entry_name)
        .context("failed to read zip entry")?;
    let mut out = fs::File::create(dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;
    std::io::copy(&mut entry, &mut out)
        .with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn format_sniffing_by_extension() {
        assert_eq!(
            ReleaseArchive::from_name("mado-macOS-arm64.tar.gz"),
            ReleaseArchive::TarGz
        );
        assert_eq!(
            ReleaseArchive::from_name("mado-Windows-msvc-x86_64.zip"),
            ReleaseArchive::Zip
        );
    }

    #[test]
    fn asset_name_matches_release_convention() {
        let asset = release_asset_name();
        assert!(asset.starts_with("mado-"));
        assert!(asset.ends_with(".tar.gz") || asset.ends_with(".zip"));
    }

    #[test]
    fn tar_extraction_finds_nested_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("mado-macOS-arm64/README.md", b"docs".as_slice()),
                ("mado-macOS-arm64/mado", b"#!ELF fake binary".as_slice()),
            ],
        );

        let dest = tmp.path().join("mado");
        ReleaseArchive::TarGz.extract_tool(&archive, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"#!ELF fake binary");
    }

    #[test]
    fn tar_extraction_accepts_bare_entry_name() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.tar.gz");
        write_tar_gz(&archive, &[("mado", b"binary".as_slice())]);

        let dest = tmp.path().join("mado");
        ReleaseArchive::TarGz.extract_tool(&archive, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"binary");
    }

    #[test]
    fn tar_extraction_without_tool_entry_fails_and_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.tar.gz");
        write_tar_gz(&archive, &[("mado-macOS-arm64/README.md", b"docs".as_slice())]);

        let dest = tmp.path().join("mado");
        let result = ReleaseArchive::TarGz.extract_tool(&archive, &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn zip_extraction_finds_exe_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.zip");
        write_zip(
            &archive,
            &[("mado-Windows-msvc-x86_64/mado.exe", b"MZ fake".as_slice())],
        );

        let dest = tmp.path().join("mado");
        ReleaseArchive::Zip.extract_tool(&archive, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"MZ fake");
    }

    #[test]
    fn zip_extraction_without_tool_entry_fails_and_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.zip");
        write_zip(&archive, &[("mado-Windows-msvc-x86_64/LICENSE", b"MIT".as_slice())]);

        let dest = tmp.path().join("mado");
        assert!(ReleaseArchive::Zip.extract_tool(&archive, &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn ensure_binary_is_idempotent_once_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let tools_dir = tmp.path().join(".tools");
        fs::create_dir_all(&tools_dir).unwrap();
        let cached = cache_path(&tools_dir);
        fs::write(&cached, b"existing binary").unwrap();

        // No network access happens on the fast path, so this must succeed
        // offline, twice, without touching the file.
        for _ in 0..2 {
            let resolved = ensure_binary(&tools_dir).unwrap();
            assert_eq!(resolved, cached);
        }
        assert_eq!(fs::read(&cached).unwrap(), b"existing binary");
    }

    #[cfg(unix)]
    #[test]
    fn extracted_binary_gets_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("release.tar.gz");
        write_tar_gz(&archive, &[("mado-Linux-gnu-x86_64/mado", b"bin".as_slice())]);

        let dest = tmp.path().join("mado");
        ReleaseArchive::TarGz.extract_tool(&archive, &dest).unwrap();
        set_executable(&dest).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
