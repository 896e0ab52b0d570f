//! # Admission Protocol Verification
//!
//! Cross-thread checks of the gate and layer locks through the public
//! facade: axis exclusivity, disjoint-layer parallelism, same-layer
//! serialization, snapshot consistency, and cancellation liveness.
//!
//! Hook-based probes observe what the engine guarantees: hooks run while
//! the calling thread holds the relevant locks, so overlap measured inside
//! them is overlap inside the protected sections.
//!
//! Run with: cargo test --package minotaur_core --test concurrency

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use minotaur_core::{Cube, CubeError, CubeObserver, Face};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Measures how many rotations are inside their protected section at once.
#[derive(Default)]
struct OverlapProbe {
    inside: AtomicUsize,
    peak: AtomicUsize,
    dwell: Duration,
}

impl OverlapProbe {
    fn with_dwell(dwell: Duration) -> Self {
        Self {
            dwell,
            ..Self::default()
        }
    }
}

impl CubeObserver for OverlapProbe {
    fn before_rotation(&self, _face: Face, _layer: usize) {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.dwell);
    }

    fn after_rotation(&self, _face: Face, _layer: usize) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }

    fn before_snapshot(&self) {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.dwell);
    }

    fn after_snapshot(&self) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn disjoint_layers_of_one_axis_run_in_parallel() {
    let probe = Arc::new(OverlapProbe::with_dwell(Duration::from_millis(200)));
    let cube = Cube::with_observer(2, Arc::clone(&probe) as Arc<dyn CubeObserver>);
    let start = Arc::new(Barrier::new(2));

    let workers: Vec<_> = [0usize, 1usize]
        .into_iter()
        .map(|layer| {
            let cube = Arc::clone(&cube);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                cube.rotate(Face::Left, layer).unwrap()
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(probe.peak.load(Ordering::SeqCst), 2, "rotations never overlapped");

    // disjoint slices commute: the result equals either serial order
    let reference = Cube::new(2);
    reference.rotate(Face::Left, 0).unwrap();
    reference.rotate(Face::Left, 1).unwrap();
    assert_eq!(
        cube.snapshot().unwrap(),
        reference.snapshot().unwrap()
    );
}

#[test]
fn same_physical_layer_serializes() {
    // (Up, 0) and (Down, 1) address the same slice from opposite caps
    for _ in 0..5 {
        let probe = Arc::new(OverlapProbe::with_dwell(Duration::from_millis(20)));
        let cube = Cube::with_observer(2, Arc::clone(&probe) as Arc<dyn CubeObserver>);
        let start = Arc::new(Barrier::new(2));

        let spawn = |face: Face, layer: usize| {
            let cube = Arc::clone(&cube);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                cube.rotate(face, layer).unwrap()
            })
        };
        let a = spawn(Face::Up, 0);
        let b = spawn(Face::Down, 1);
        a.join().unwrap();
        b.join().unwrap();

        assert_eq!(probe.peak.load(Ordering::SeqCst), 1, "same layer overlapped");
        // the two rotations are mutual inverses, so either order restores
        assert!(cube.snapshot().unwrap().is_solved());
    }
}

/// Flags any instant at which two admission groups are inside protected
/// sections together.
#[derive(Default)]
struct ExclusivityProbe {
    in_flight: [AtomicUsize; 4],
    violated: AtomicBool,
}

impl ExclusivityProbe {
    fn arrive(&self, group: usize) {
        self.in_flight[group].fetch_add(1, Ordering::SeqCst);
        for (other, count) in self.in_flight.iter().enumerate() {
            if other != group && count.load(Ordering::SeqCst) > 0 {
                self.violated.store(true, Ordering::SeqCst);
            }
        }
        thread::sleep(Duration::from_millis(2));
    }

    fn leave(&self, group: usize) {
        self.in_flight[group].fetch_sub(1, Ordering::SeqCst);
    }
}

impl CubeObserver for ExclusivityProbe {
    fn before_rotation(&self, face: Face, _layer: usize) {
        self.arrive(face.axis().index());
    }

    fn after_rotation(&self, face: Face, _layer: usize) {
        self.leave(face.axis().index());
    }

    fn before_snapshot(&self) {
        self.arrive(3);
    }

    fn after_snapshot(&self) {
        self.leave(3);
    }
}

#[test]
fn admitted_threads_always_share_one_group() {
    let probe = Arc::new(ExclusivityProbe::default());
    let cube = Cube::with_observer(3, Arc::clone(&probe) as Arc<dyn CubeObserver>);
    let start = Arc::new(Barrier::new(12));

    let workers: Vec<_> = (0..12u64)
        .map(|id| {
            let cube = Arc::clone(&cube);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE + id);
                start.wait();
                for _ in 0..25 {
                    if rng.gen_range(0..4) == 0 {
                        cube.snapshot().unwrap();
                    } else {
                        let face = Face::try_from(rng.gen_range(0..6u8)).unwrap();
                        let layer = rng.gen_range(0..3);
                        cube.rotate(face, layer).unwrap();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert!(
        !probe.violated.load(Ordering::SeqCst),
        "two admission groups were active at the same instant"
    );
}

#[test]
fn multiple_snapshots_are_admitted_together() {
    let probe = Arc::new(OverlapProbe::with_dwell(Duration::from_millis(200)));
    let cube = Cube::with_observer(2, Arc::clone(&probe) as Arc<dyn CubeObserver>);
    let start = Arc::new(Barrier::new(2));

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let cube = Arc::clone(&cube);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                cube.snapshot().unwrap()
            })
        })
        .collect();
    for reader in readers {
        assert!(reader.join().unwrap().is_solved());
    }
    assert_eq!(probe.peak.load(Ordering::SeqCst), 2, "snapshots never overlapped");
}

/// Records every completed rotation in completion order.
#[derive(Default)]
struct CompletionLog {
    completed: Mutex<Vec<(Face, usize)>>,
}

impl CubeObserver for CompletionLog {
    fn after_rotation(&self, face: Face, layer: usize) {
        self.completed.lock().unwrap().push((face, layer));
    }
}

#[test]
fn snapshot_equals_replay_of_completed_rotations() {
    let log = Arc::new(CompletionLog::default());
    let cube = Cube::with_observer(3, Arc::clone(&log) as Arc<dyn CubeObserver>);

    let workers: Vec<_> = (0..6u64)
        .map(|id| {
            let cube = Arc::clone(&cube);
            thread::spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(id);
                for _ in 0..30 {
                    let face = Face::try_from(rng.gen_range(0..6u8)).unwrap();
                    let layer = rng.gen_range(0..3);
                    cube.rotate(face, layer).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let replay = Cube::new(3);
    for &(face, layer) in log.completed.lock().unwrap().iter() {
        replay.rotate(face, layer).unwrap();
    }
    assert_eq!(cube.snapshot().unwrap(), replay.snapshot().unwrap());
}

/// Holds the first rotation that reaches its hook open inside the
/// protected section until released; later rotations pass through.
struct HoldOpen {
    gate: Receiver<()>,
    armed: AtomicBool,
}

impl HoldOpen {
    fn new(gate: Receiver<()>) -> Self {
        Self {
            gate,
            armed: AtomicBool::new(true),
        }
    }
}

impl CubeObserver for HoldOpen {
    fn before_rotation(&self, _face: Face, _layer: usize) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.gate.recv().unwrap();
        }
    }
}

fn spawn_holder(
    cube: &Arc<Cube>,
    face: Face,
    layer: usize,
) -> thread::JoinHandle<Result<(), CubeError>> {
    let cube = Arc::clone(cube);
    thread::spawn(move || cube.rotate(face, layer))
}

#[test]
fn cancelling_queued_waiters_never_wedges_the_gate() {
    let (release_tx, release_rx): (Sender<()>, Receiver<()>) = bounded(1);
    let cube = Cube::with_observer(3, Arc::new(HoldOpen::new(release_rx)));
    let token = cube.cancel_token();

    // occupy the UpDown axis and keep its rotation open
    let holder = spawn_holder(&cube, Face::Up, 0);
    thread::sleep(Duration::from_millis(100));

    // queue four FrontBack rotations behind it, all sharing one token
    let (done_tx, done_rx) = bounded(4);
    let waiters: Vec<_> = (0..4usize)
        .map(|i| {
            let cube = Arc::clone(&cube);
            let token = token.clone();
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                let result = cube.rotate_with(Face::Front, i % 3, &token);
                done_tx.send(result).unwrap();
            })
        })
        .collect();
    thread::sleep(Duration::from_millis(100));

    token.cancel();
    // the three followers abort promptly; the leader is uncancellable
    // while it waits for its committed turn
    for _ in 0..3 {
        let result = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result, Err(CubeError::Cancelled));
    }
    assert!(done_rx.try_recv().is_err(), "leader aborted before its turn");

    // release the holder: the leader gets its turn, then observes the
    // fired token at the layer lock and backs out through the exit protocol
    release_tx.send(()).unwrap();
    holder.join().unwrap().unwrap();
    let result = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(result, Err(CubeError::Cancelled));
    for waiter in waiters {
        waiter.join().unwrap();
    }

    // the gate is idle again: uncancelled calls on any axis complete
    cube.rotate(Face::Front, 1).unwrap();
    cube.rotate(Face::Left, 2).unwrap();

    // only the held rotation and the two calls above ever mutated the grid
    let replay = Cube::new(3);
    replay.rotate(Face::Up, 0).unwrap();
    replay.rotate(Face::Front, 1).unwrap();
    replay.rotate(Face::Left, 2).unwrap();
    assert_eq!(cube.snapshot().unwrap(), replay.snapshot().unwrap());
}

#[test]
fn cancelling_a_layer_wait_leaves_the_axis_usable() {
    let (release_tx, release_rx) = bounded(1);
    let cube = Cube::with_observer(2, Arc::new(HoldOpen::new(release_rx)));
    let token = cube.cancel_token();

    // holder keeps physical depth 0 locked under the UpDown axis
    let holder = spawn_holder(&cube, Face::Up, 0);
    thread::sleep(Duration::from_millis(100));

    // same axis, same depth from the opposite cap: joins the active group,
    // then blocks on the layer lock
    let blocked = {
        let cube = Arc::clone(&cube);
        let token = token.clone();
        thread::spawn(move || cube.rotate_with(Face::Down, 1, &token))
    };
    thread::sleep(Duration::from_millis(100));

    token.cancel();
    assert_eq!(blocked.join().unwrap(), Err(CubeError::Cancelled));

    release_tx.send(()).unwrap();
    holder.join().unwrap().unwrap();

    // exactly one rotation landed; three more close the cycle
    for _ in 0..3 {
        cube.rotate(Face::Up, 0).unwrap();
    }
    assert!(cube.snapshot().unwrap().is_solved());
}

#[test]
fn snapshot_follower_cancels_while_its_leader_waits() {
    let (release_tx, release_rx) = bounded(1);
    let cube = Cube::with_observer(2, Arc::new(HoldOpen::new(release_rx)));
    let token = cube.cancel_token();

    let holder = spawn_holder(&cube, Face::Front, 0);
    thread::sleep(Duration::from_millis(100));

    // first snapshot waiter leads the snapshot group's turn
    let leader = {
        let cube = Arc::clone(&cube);
        thread::spawn(move || cube.snapshot())
    };
    thread::sleep(Duration::from_millis(100));
    // second waiter follows, carrying the token
    let follower = {
        let cube = Arc::clone(&cube);
        let token = token.clone();
        thread::spawn(move || cube.snapshot_with(&token))
    };
    thread::sleep(Duration::from_millis(100));

    token.cancel();
    assert_eq!(follower.join().unwrap(), Err(CubeError::Cancelled));

    release_tx.send(()).unwrap();
    holder.join().unwrap().unwrap();
    // the leader's snapshot sees the completed rotation
    assert!(!leader.join().unwrap().unwrap().is_solved());
}
