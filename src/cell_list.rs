use crate::particle::Particle;
use ultraviolet::Vec3;

/// Uniform 3-D grid over an axis-aligned box, used for cutoff neighbour queries.
pub struct CellList {
    pub min: Vec3,
    pub max: Vec3,
    pub cell_size: f32,
    grid: [usize; 3],
    cells: Vec<Vec<usize>>, // indices of particles per cell
}

impl CellList {
    /// `cell_size` is raised so that no axis has more than `max_cells_per_axis` cells.
    pub fn new(min: Vec3, max: Vec3, cell_size: f32, max_cells_per_axis: usize) -> Self {
        let extent = max - min;
        let longest = extent.x.max(extent.y).max(extent.z);
        let cell_size = cell_size.max(longest / max_cells_per_axis.max(1) as f32).max(1e-6);
        let dim = |e: f32| ((e / cell_size).ceil() as usize).max(1);
        Self {
            min,
            max,
            cell_size,
            grid: [dim(extent.x), dim(extent.y), dim(extent.z)],
            cells: Vec::new(),
        }
    }

    /// Bin every active particle. Positions outside the box are clamped to the edge cells.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        let n_cells = self.grid[0] * self.grid[1] * self.grid[2];
        for cell in &mut self.cells {
            cell.clear();
        }
        self.cells.resize(n_cells, Vec::new());
        for (i, p) in particles.iter().enumerate() {
            if !p.active {
                continue;
            }
            let c = self.coord(p.pos);
            let idx = self.flat(c);
            self.cells[idx].push(i);
        }
    }

    fn coord(&self, pos: Vec3) -> [usize; 3] {
        let rel = pos - self.min;
        let axis = |v: f32, n: usize| {
            let c = (v / self.cell_size).floor() as isize;
            c.clamp(0, n as isize - 1) as usize
        };
        [
            axis(rel.x, self.grid[0]),
            axis(rel.y, self.grid[1]),
            axis(rel.z, self.grid[2]),
        ]
    }

    fn flat(&self, c: [usize; 3]) -> usize {
        c[0] + self.grid[0] * (c[1] + self.grid[1] * c[2])
    }

    /// Active particles within `cutoff` of particle `i`, excluding `i` itself.
    pub fn find_neighbors_within(&self, particles: &[Particle], i: usize, cutoff: f32) -> Vec<usize> {
        let origin = particles[i].pos;
        let c = self.coord(origin);
        let widest = self.grid[0].max(self.grid[1]).max(self.grid[2]) as f32;
        let range = (cutoff / self.cell_size).ceil().min(widest) as isize;
        let cutoff_sq = cutoff * cutoff;
        let mut neighbors = Vec::new();
        for dz in -range..=range {
            for dy in -range..=range {
                for dx in -range..=range {
                    let x = c[0] as isize + dx;
                    let y = c[1] as isize + dy;
                    let z = c[2] as isize + dz;
                    if x < 0
                        || y < 0
                        || z < 0
                        || x >= self.grid[0] as isize
                        || y >= self.grid[1] as isize
                        || z >= self.grid[2] as isize
                    {
                        continue;
                    }
                    let cell = self.flat([x as usize, y as usize, z as usize]);
                    for &idx in &self.cells[cell] {
                        if idx != i && (particles[idx].pos - origin).mag_sq() < cutoff_sq {
                            neighbors.push(idx);
                        }
                    }
                }
            }
        }
        neighbors.sort_unstable();
        neighbors
    }
}
