use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;

const SYMBOLS: [char; 6] = ['*', '+', '•', '▪', '◆', '✦'];
const GRAVITY: f64 = 15.0;

/// Colour scheme of the burst: cyan for machines, red for meatbags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Silicon,
    Meat,
}

impl Palette {
    pub fn colors(&self) -> [Color; 3] {
        match self {
            Palette::Silicon => [
                Color::Rgb(0, 229, 204),
                Color::Rgb(20, 184, 166),
                Color::Rgb(13, 110, 99),
            ],
            Palette::Meat => [
                Color::Rgb(255, 77, 77),
                Color::Rgb(230, 57, 70),
                Color::Rgb(153, 27, 27),
            ],
        }
    }
}

/// Particle count and palette for a final score
pub fn burst_for_score(score: u32) -> (usize, Palette) {
    if score > 3 {
        (150, Palette::Silicon)
    } else {
        (50, Palette::Meat)
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn launch<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        // upward cone roughly 70 degrees wide
        let angle = rng.gen_range(-35.0_f64..35.0).to_radians();
        let speed = rng.gen_range(6.0..14.0);
        Self {
            x,
            y,
            vel_x: speed * angle.sin() * 2.0,
            vel_y: -speed * angle.cos(),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..3),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    /// 1.0 when fresh, 0.0 at end of life
    pub fn life_left(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct Confetti {
    pub particles: Vec<Particle>,
    pub palette: Palette,
    pub is_active: bool,
    elapsed: f64,
    duration: f64,
    width: f64,
    height: f64,
}

impl Confetti {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            palette: Palette::Meat,
            is_active: false,
            elapsed: 0.0,
            duration: 3.0,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, count: usize, palette: Palette, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.width = f64::from(width);
        self.height = f64::from(height);
        self.palette = palette;
        self.elapsed = 0.0;
        self.is_active = true;

        let origin_x = self.width / 2.0;
        let origin_y = self.height * 0.6;
        self.particles = (0..count)
            .map(|_| Particle::launch(origin_x, origin_y, &mut rng))
            .collect();
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }

    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            let margin = 5.0;
            let off_screen = p.y > height + margin || p.x < -margin || p.x > width + margin;
            alive && !off_screen
        });
    }
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_size_depends_on_score() {
        assert_eq!(burst_for_score(6), (150, Palette::Silicon));
        assert_eq!(burst_for_score(4), (150, Palette::Silicon));
        assert_eq!(burst_for_score(3), (50, Palette::Meat));
        assert_eq!(burst_for_score(0), (50, Palette::Meat));
    }

    #[test]
    fn start_spawns_requested_particles() {
        let mut confetti = Confetti::new();
        assert!(!confetti.is_active);

        confetti.start(50, Palette::Meat, 80, 24);
        assert!(confetti.is_active);
        assert_eq!(confetti.particles.len(), 50);
        assert!(confetti.particles.iter().all(|p| p.vel_y < 0.0));
    }

    #[test]
    fn particles_move_and_fall() {
        let mut confetti = Confetti::new();
        confetti.start(10, Palette::Silicon, 80, 24);
        let before: Vec<_> = confetti.particles.iter().map(|p| (p.y, p.vel_y)).collect();

        confetti.update(0.1);
        for (p, (y, vel_y)) in confetti.particles.iter().zip(before) {
            assert_ne!(p.y, y);
            assert!(p.vel_y > vel_y);
        }
    }

    #[test]
    fn burst_ends_after_duration() {
        let mut confetti = Confetti::new();
        confetti.start(150, Palette::Silicon, 80, 24);
        for _ in 0..31 {
            confetti.update(0.1);
        }
        assert!(!confetti.is_active);
        assert!(confetti.particles.is_empty());
    }

    #[test]
    fn off_screen_particles_are_dropped() {
        let mut confetti = Confetti::new();
        confetti.start(0, Palette::Meat, 20, 10);
        confetti.particles.push(Particle {
            x: 100.0,
            y: 100.0,
            vel_x: 0.0,
            vel_y: 0.0,
            symbol: '*',
            color_index: 0,
            age: 0.0,
            max_age: 10.0,
        });
        confetti.update(0.1);
        assert!(confetti.particles.is_empty());
    }
}
