use std::{
    io::Write as _,
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{
    foundation::error::{SphereshadeError, SphereshadeResult},
    render::snapshot::{SnapshotRequest, SphereRenderer},
};

/// [`SphereRenderer`] backed by an external program.
///
/// The program is started once per snapshot with the configured `args` followed by
///
/// ```text
/// --canvas WxH --source WxH --center x,y,z --radius r --density n
/// --frame left,right,bottom,top,distance --axis 0|1
/// ```
///
/// It reads the source texture as raw RGBA8 from stdin and must write exactly
/// `canvas.width * canvas.height` RGBA8 pixels to stdout before exiting with status 0.
#[derive(Clone, Debug)]
pub struct CommandRenderer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl SphereRenderer for CommandRenderer {
    fn snapshot_sphere(&mut self, req: &SnapshotRequest<'_>) -> SphereshadeResult<Vec<u8>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(request_args(req))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(program = %self.program.display(), "spawning renderer");
        let mut child = cmd.spawn().map_err(|e| {
            SphereshadeError::collaborator(format!(
                "failed to spawn renderer '{}': {e}",
                self.program.display()
            ))
        })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SphereshadeError::collaborator("failed to open renderer stdin"))?;

        // Feed stdin from a second thread so a renderer that streams output early cannot
        // deadlock against a full stdout pipe.
        let source = req.source.as_bytes();
        let (output, written) = std::thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(source));
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| {
            SphereshadeError::collaborator(format!("failed to wait for renderer: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SphereshadeError::collaborator(format!(
                "renderer '{}' exited with status {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(Ok(())) => {}
            // A renderer may legitimately ignore its texture and close stdin early.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("renderer closed stdin before reading the full texture");
            }
            Ok(Err(e)) => {
                return Err(SphereshadeError::collaborator(format!(
                    "failed to write texture to renderer stdin: {e}"
                )));
            }
            Err(_) => {
                return Err(SphereshadeError::collaborator(
                    "renderer stdin writer panicked",
                ));
            }
        }

        Ok(output.stdout)
    }
}

fn request_args(req: &SnapshotRequest<'_>) -> Vec<String> {
    let f = req.frame;
    let c = req.center;
    vec![
        "--canvas".into(),
        format!("{}x{}", req.canvas.width, req.canvas.height),
        "--source".into(),
        format!("{}x{}", req.source.width(), req.source.height()),
        "--center".into(),
        format!("{},{},{}", c.x, c.y, c.z),
        "--radius".into(),
        req.radius.to_string(),
        "--density".into(),
        req.density.to_string(),
        "--frame".into(),
        format!("{},{},{},{},{}", f.left, f.right, f.bottom, f.top, f.distance),
        "--axis".into(),
        req.axis.wire_value().to_string(),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/command.rs"]
mod tests;
