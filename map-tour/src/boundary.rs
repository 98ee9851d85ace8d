use std::{
    fmt, fs,
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread,
    time::Duration,
};

use logger::{Color, Logger};
use serde::Deserialize;

use crate::{
    config::BoundaryConfig,
    scroll::{PageTargets, ScrollController},
    surface::MapSurface,
    types::BoundaryGeometry,
};

const FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug)]
pub enum BoundaryError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-2xx status.
    Status(u16, String),
    Io(std::io::Error),
    /// The body is not a polygon feature with a usable ring.
    Format(String),
}

impl BoundaryError {
    /// Network-class failure, as opposed to a bad payload.
    pub fn is_network(&self) -> bool {
        !matches!(self, BoundaryError::Format(_))
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::Network(msg) => write!(f, "Network error: {}", msg),
            BoundaryError::Status(code, reason) => write!(f, "HTTP {}: {}", code, reason),
            BoundaryError::Io(e) => write!(f, "I/O error: {}", e),
            BoundaryError::Format(msg) => write!(f, "Invalid boundary data format: {}", msg),
        }
    }
}

impl std::error::Error for BoundaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoundaryError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BoundaryError {
    fn from(err: std::io::Error) -> Self {
        BoundaryError::Io(err)
    }
}

impl From<reqwest::Error> for BoundaryError {
    fn from(err: reqwest::Error) -> Self {
        BoundaryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BoundaryError {
    fn from(err: serde_json::Error) -> Self {
        BoundaryError::Format(err.to_string())
    }
}

/// Where static assets come from.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, BoundaryError>;
}

/// Asset base given in the config: a web origin or a local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetBase {
    Http(String),
    Dir(PathBuf),
}

impl AssetBase {
    pub fn parse(base: &str) -> Self {
        if base.starts_with("http://") || base.starts_with("https://") {
            AssetBase::Http(base.trim_end_matches('/').to_string())
        } else {
            AssetBase::Dir(PathBuf::from(base))
        }
    }

    /// Absolute URLs pass through; relative ones hang off the base.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        let relative = url.trim_start_matches('/');
        match self {
            AssetBase::Http(origin) => format!("{}/{}", origin, relative),
            AssetBase::Dir(dir) => dir.join(relative).to_string_lossy().into_owned(),
        }
    }
}

/// Fetches assets relative to an `AssetBase`, reusing one HTTP client
/// for every web request.
pub struct AssetClient {
    base: AssetBase,
    http: Result<reqwest::blocking::Client, String>,
}

impl AssetClient {
    pub fn new(base: AssetBase) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| e.to_string());
        Self { base, http }
    }
}

impl AssetSource for AssetClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, BoundaryError> {
        let target = self.base.resolve(url);
        if target.starts_with("http://") || target.starts_with("https://") {
            let client = self.http.as_ref().map_err(|e| {
                BoundaryError::Network(format!("HTTP client unavailable: {}", e))
            })?;
            let response = client.get(&target).send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(BoundaryError::Status(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("").to_string(),
                ));
            }
            Ok(response.bytes()?.to_vec())
        } else {
            Ok(fs::read(target)?)
        }
    }
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Option<Vec<Vec<Vec<f64>>>>,
}

/// Reads the outer ring of a polygon feature (`geometry.coordinates[0]`,
/// points as `[lon, lat, ...]`).
pub fn parse_boundary(bytes: &[u8]) -> Result<BoundaryGeometry, BoundaryError> {
    let feature: Feature = serde_json::from_slice(bytes)?;

    let ring = feature
        .geometry
        .and_then(|geometry| geometry.coordinates)
        .and_then(|rings| rings.into_iter().next())
        .ok_or_else(|| BoundaryError::Format("missing geometry.coordinates".to_string()))?;

    let points = ring
        .into_iter()
        .map(|point| match point.as_slice() {
            [lon, lat, ..] => Ok([*lon, *lat]),
            _ => Err(BoundaryError::Format(
                "coordinate with fewer than two values".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    BoundaryGeometry::from_ring(points)
        .ok_or_else(|| BoundaryError::Format("ring has fewer than three points".to_string()))
}

/// Status bar text after a boundary failure. The second failure says
/// both are gone.
pub fn failure_message(name: &str, previous_failures: usize) -> String {
    if previous_failures == 0 {
        format!("Warning: {} boundary failed to load", name)
    } else {
        "Warning: Both boundaries failed to load".to_string()
    }
}

/// Registers the rendering panes of every boundary.
pub fn create_panes<S: MapSurface>(surface: &mut S, boundaries: &[BoundaryConfig]) {
    for boundary in boundaries {
        surface.create_pane(&boundary.pane, boundary.z_index);
    }
}

type LoadResult = (usize, Result<BoundaryGeometry, BoundaryError>);

/// Fetches all boundaries concurrently, one worker thread each, and
/// hands finished loads to the map on the frame thread.
pub struct BoundaryLoader {
    boundaries: Vec<BoundaryConfig>,
    receiver: Receiver<LoadResult>,
    ready: Vec<LoadResult>,
    pending: usize,
    failures: usize,
    logger: Logger,
}

impl BoundaryLoader {
    pub fn spawn(
        boundaries: &[BoundaryConfig],
        source: Arc<dyn AssetSource>,
        logger: Logger,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let mut ready = Vec::new();

        for (index, boundary) in boundaries.iter().enumerate() {
            let sender = sender.clone();
            let source = source.clone();
            let url = boundary.url.clone();

            let spawned = thread::Builder::new()
                .name(format!("boundary-{}", boundary.name.to_lowercase()))
                .spawn(move || {
                    let result = source.fetch(&url).and_then(|bytes| parse_boundary(&bytes));
                    // The loader may be gone already; nobody left to tell.
                    let _ = sender.send((index, result));
                });

            if let Err(e) = spawned {
                ready.push((index, Err(BoundaryError::Io(e))));
            }
        }

        Self {
            boundaries: boundaries.to_vec(),
            receiver,
            ready,
            pending: boundaries.len(),
            failures: 0,
            logger,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Applies every load that finished since the last poll. Returns how
    /// many were applied.
    pub fn poll<S: MapSurface, P: PageTargets>(
        &mut self,
        surface: &mut S,
        controller: &mut ScrollController,
        page: &mut P,
    ) -> usize {
        let mut done: Vec<LoadResult> = std::mem::take(&mut self.ready);
        loop {
            match self.receiver.try_recv() {
                Ok(load) => done.push(load),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.pending > done.len() {
                        let _ = self
                            .logger
                            .error("Boundary workers exited without reporting", true);
                        self.pending = done.len();
                    }
                    break;
                }
            }
        }

        let count = done.len();
        for (index, result) in done {
            self.settle(index, result, surface, controller, page);
        }
        count
    }

    /// Blocks until every load has finished, then applies them.
    pub fn finish<S: MapSurface, P: PageTargets>(
        &mut self,
        surface: &mut S,
        controller: &mut ScrollController,
        page: &mut P,
    ) {
        while self.pending > self.ready.len() {
            match self.receiver.recv() {
                Ok(load) => self.ready.push(load),
                Err(_) => break,
            }
        }
        let done = std::mem::take(&mut self.ready);
        for (index, result) in done {
            self.settle(index, result, surface, controller, page);
        }
        self.pending = 0;
    }

    fn settle<S: MapSurface, P: PageTargets>(
        &mut self,
        index: usize,
        result: Result<BoundaryGeometry, BoundaryError>,
        surface: &mut S,
        controller: &mut ScrollController,
        page: &mut P,
    ) {
        self.pending = self.pending.saturating_sub(1);
        let Some(boundary) = self.boundaries.get(index) else {
            return;
        };

        match result {
            Ok(geometry) => {
                let _ = self.logger.info(
                    &format!(
                        "Loading {} boundary with {} points",
                        boundary.name,
                        geometry.point_count()
                    ),
                    Color::Cyan,
                    true,
                );
                let overlay = surface.add_overlay(&boundary.pane, geometry, boundary.style);
                controller.attach_boundary(&boundary.name, overlay, surface);
                let _ = self.logger.info(
                    &format!("{} boundary layer created", boundary.name),
                    Color::Green,
                    true,
                );
            }
            Err(e) => {
                let _ = self
                    .logger
                    .error(&format!("Could not load {} boundary: {}", boundary.name, e), true);
                page.show_status_error(&failure_message(&boundary.name, self.failures));
                self.failures += 1;
            }
        }
    }
}
