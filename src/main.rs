use anyhow::{bail, Context, Result};
use crystal::prelude::*;
use log::{debug, warn};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use walkdir::WalkDir;

use ve_wavefront::{
    mesh::obj,
    ve_format::{
        material::MaterialLibrary,
        mesh::{MeshFile, MeshModel},
    },
    ExportOptions, ExportTarget, ImportStatus, LogProgress, MeshInstance, ObjImport, ParseOptions,
};

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "ve_wavefront")]
struct CliArgs {
    /// Output debug info
    #[structopt(short = "v", long = "verbose", global = true)]
    verbose: bool,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Print a summary of the models in an `.obj` or converted `.vem` file
    Inspect {
        input: PathBuf,
        /// Forward axis index: 0..=5 for -x -y -z +x +y +z
        #[structopt(long)]
        forward: Option<String>,
        /// Up axis index: 0..=5 for -x -y -z +x +y +z
        #[structopt(long)]
        up: Option<String>,
    },
    /// Convert every `.obj` file below the input into binary `.vem` mesh files
    Convert {
        /// Input file or folder
        input: PathBuf,
        /// Output directory, to place the converted files in
        #[structopt(short = "o", long = "output")]
        output: PathBuf,
    },
    /// Import an `.obj` file and write it back out, compacted
    Export {
        input: PathBuf,
        /// Output directory
        #[structopt(short = "o", long = "output")]
        output: PathBuf,
        /// Append the current UNIX time to the file names
        #[structopt(long)]
        timestamp: bool,
        /// Move every model by `x y z`
        #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
        offset: Vec<f32>,
    },
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input does not exist: {0}")]
    InputNonExistant(PathBuf),
    #[error("Output folder structure could not be created: {0}")]
    ErrorCreatingOutputStructure(#[from] io::Error),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    match args.command {
        Command::Inspect { input, forward, up } => {
            if input.extension().map_or(false, |extension| extension == "vem") {
                let file = MeshFile::from_file(&input)
                    .with_context(|| format!("Could not read {}", input.display()))?;
                inspect(&file.models, &MaterialLibrary::new());
                return Ok(());
            }

            let options = match (forward, up) {
                (None, None) => obj::parse_meta(&input)?,
                (forward, up) => ParseOptions::from_settings(&[
                    forward.unwrap_or_default(),
                    up.unwrap_or_default(),
                ]),
            };
            let import = load(&input, &options)?;
            inspect(&import.models, &import.materials);
            Ok(())
        }
        Command::Convert { input, output } => convert(&input, &output),
        Command::Export {
            input,
            output,
            timestamp,
            offset,
        } => {
            let offset = match offset.as_slice() {
                [] => Vec3::zero(),
                [x, y, z] => Vec3::new(*x, *y, *z),
                _ => bail!("--offset takes exactly three values"),
            };
            export(&input, &output, timestamp, offset)
        }
    }
}

fn load(input: &Path, options: &ParseOptions) -> Result<ObjImport> {
    if !input.is_file() {
        return Err(CliError::InputNonExistant(input.into()).into());
    }

    let mut progress = LogProgress::new(format!("Importing {}", input.display()));
    let import = ve_wavefront::import(input, options, &mut progress)
        .with_context(|| format!("Could not read {}", input.display()))?;

    match &import.status {
        ImportStatus::Complete => {}
        ImportStatus::Empty => warn!("{} contains no models", input.display()),
        ImportStatus::Truncated(truncation) => warn!(
            "{} was read up to line {}: {}",
            input.display(),
            truncation.line,
            truncation.error
        ),
    }

    Ok(import)
}

fn inspect(models: &[MeshModel], materials: &MaterialLibrary) {
    for model in models {
        println!("{} (#{})", model.title, model.id);
        println!(
            "  {} vertices, {} triangles{}",
            model.count_vertices,
            model.triangle_count(),
            if model.has_texture_coordinates() {
                ", textured"
            } else {
                ""
            }
        );

        let material = &model.material;
        if material.name.is_empty() {
            println!("  no material");
            continue;
        }
        println!("  material `{}`", material.name);
        for (slot, texture) in material.textures() {
            println!(
                "    {} {}{}",
                slot.keyword(),
                texture.path.display(),
                if texture.use_texture { "" } else { " (missing)" }
            );
        }
    }

    let mut unused: Vec<_> = materials
        .keys()
        .filter(|name| models.iter().all(|model| &model.material.name != *name))
        .collect();
    if !unused.is_empty() {
        unused.sort();
        println!("unused materials: {:?}", unused);
    }
}

fn export(input: &Path, output: &Path, timestamp: bool, offset: Vec3<f32>) -> Result<()> {
    let import = load(input, &obj::parse_meta(input)?)?;
    let instances: Vec<_> = import
        .models
        .iter()
        .map(|model| MeshInstance::at(model, offset))
        .collect();

    fs::create_dir_all(output).map_err(CliError::ErrorCreatingOutputStructure)?;
    let target = ExportTarget::from_path(&output.join(input.file_name().unwrap_or_default()))?;
    let options = ExportOptions {
        timestamp_suffix: timestamp,
        ..ExportOptions::default()
    };

    let mut progress = LogProgress::new(format!("Exporting {}", input.display()));
    let files = ve_wavefront::export(&instances, &target, &options, &mut progress)?;
    println!("{}\n{}", files.obj.display(), files.mtl.display());
    Ok(())
}

fn convert(input_path: &Path, output_path: &Path) -> Result<()> {
    if !input_path.exists() {
        return Err(CliError::InputNonExistant(input_path.into()).into());
    }

    for entry in WalkDir::new(input_path) {
        let path = match &entry {
            Err(err) => {
                warn!("Error parsing path: {}", err);
                continue;
            }
            Ok(entry) => entry.path(),
        };

        if path.is_dir() {
            continue;
        }

        // a single input file strips down to an empty relative path
        let relative = path.strip_prefix(input_path).unwrap_or(path);

        // creating the output folder of the input file in the same structure
        let local_output_folder = match relative.parent() {
            Some(parent) => output_path.join(parent),
            None => output_path.to_path_buf(),
        };
        if !local_output_folder.exists() {
            fs::create_dir_all(&local_output_folder)
                .map_err(CliError::ErrorCreatingOutputStructure)?;
        }

        // check extension
        if let Some(Some(extension)) = path.extension().map(|x| x.to_str()) {
            match extension.to_ascii_lowercase().as_ref() {
                "obj" => {
                    if let Err(err) = obj::process(path, &local_output_folder) {
                        warn!("Skipping {}: {:#}", path.display(), err);
                    }
                }
                "mtl" | "toml" => debug!("Ignored {} file: {}", extension, &path.display()),
                _ => warn!("Could not handle path: {}", &path.display()),
            }
        } else {
            warn!(
                "Ignored file \"{}\", because no file extension was found.",
                path.display()
            );
        }
    }

    Ok(())
}
