//! Random workload and infrastructure generation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use fogsim_network::Position;

use crate::core::application::{Application, Processus};
use crate::core::common::{IdAllocator, Resources};

const CPU_CHOICES: [f64; 5] = [0.5, 1., 2., 3., 4.];
const GPU_CHOICES: [f64; 6] = [0., 0.5, 1., 4., 6., 8.];
// 10 to 50 MB/s expressed in kB/s
const BANDWIDTH_CHOICES: [f64; 5] = [10. * 1024., 20. * 1024., 30. * 1024., 40. * 1024., 50. * 1024.];

/// Draws a device position inside a `width` x `height` area, rounded to
/// centimeters.
pub fn random_position(width: f64, height: f64, rng: &mut StdRng) -> Position {
    let x = (rng.gen::<f64>() * width * 100.).round() / 100.;
    let y = (rng.gen::<f64>() * height * 100.).round() / 100.;
    Position::new(x, y, 0.)
}

/// Generates an application with random demands, a guaranteed link between
/// consecutive processes and optional links between the other pairs.
pub fn random_application(
    app_id: u32,
    max_processes: usize,
    random_count: bool,
    ids: &mut IdAllocator,
    rng: &mut StdRng,
) -> Application {
    let count = if random_count {
        rng.gen_range(1..=max_processes)
    } else {
        max_processes
    };
    let processes = (0..count)
        .map(|_| Processus {
            id: ids.allocate(),
            demand: random_demand(rng),
        })
        .collect();
    let mut matrix = vec![vec![0.; count]; count];
    for i in 0..count {
        for j in (i + 1)..count {
            if j == i + 1 || rng.gen_bool(0.5) {
                let bandwidth = *BANDWIDTH_CHOICES.choose(rng).unwrap();
                matrix[i][j] = bandwidth;
                matrix[j][i] = bandwidth;
            }
        }
    }
    Application::new(app_id, processes, matrix)
}

fn random_demand(rng: &mut StdRng) -> Resources {
    Resources::new(
        *CPU_CHOICES.choose(rng).unwrap(),
        *GPU_CHOICES.choose(rng).unwrap(),
        (rng.gen::<f64>() * 0.975 + 0.025) * 4. * 1024.,
        (rng.gen::<f64>() * 9. + 1.) * 10. * 1024.,
    )
}
