use crate::forces::{potential_energy, ForceField, Gravity};
use crate::{Body, BodyId};
use log::{debug, trace, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Начальная конфигурация одного тела для симулятора.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub mass: f64,
    /// Явный идентификатор; если не задан, берётся индекс тела (0, 1, 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl BodyConfig {
    pub fn new(position: [f64; 3], velocity: [f64; 3], mass: f64) -> Self {
        Self { position, velocity, mass, id: None }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Идентификатор по умолчанию: явный, иначе индекс тела.
    pub fn effective_id(&self, index: usize) -> u32 {
        self.id.unwrap_or(index as u32)
    }

    /// Тело с заданным идентификатором или с индексом, если его нет.
    pub fn to_body(&self, index: usize) -> Body {
        self.to_body_with_id(BodyId(self.effective_id(index)))
    }

    fn to_body_with_id(&self, id: BodyId) -> Body {
        Body::new(
            id,
            Vector3::from(self.position),
            Vector3::from(self.velocity),
            self.mass,
        )
    }
}

/// Уникальные идентификаторы для трёх тел.
/// Явный id сохраняется, если он первый с таким значением; остальные тела получают
/// свой индекс или, если он занят, следующее свободное значение.
pub fn assign_ids(configs: &[BodyConfig; 3]) -> [BodyId; 3] {
    let mut reserved: Vec<(usize, u32)> = Vec::with_capacity(3);
    for (i, c) in configs.iter().enumerate() {
        if let Some(id) = c.id {
            if !reserved.iter().any(|&(_, r)| r == id) {
                reserved.push((i, id));
            }
        }
    }

    let mut used: Vec<u32> = reserved.iter().map(|&(_, id)| id).collect();
    let mut out = [BodyId(0); 3];
    for (i, c) in configs.iter().enumerate() {
        if let Some(&(_, id)) = reserved.iter().find(|&&(owner, _)| owner == i) {
            out[i] = BodyId(id);
            continue;
        }
        let mut candidate = i as u32;
        while used.contains(&candidate) {
            candidate += 1;
        }
        if let Some(requested) = c.id {
            warn!("body {} id {} is already taken; using {}", i, requested, candidate);
        }
        used.push(candidate);
        out[i] = BodyId(candidate);
    }
    out
}

/// Полная информация об одном теле в текущий момент времени.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub id: u32,
    pub mass: f64,
    /// state = [x, y, z, vx, vy, vz]
    pub state: [f64; 6],
    /// Ускорение, применённое на последнем шаге.
    pub acceleration: [f64; 3],
}

/// Симулятор трёх тел: на каждом кадре поле ускорений, затем update каждого тела.
#[derive(Debug)]
pub struct Simulator<F: ForceField = Gravity> {
    bodies: [Body; 3],
    field: F,
    acc: [Vector3<f64>; 3],           // ускорения последнего шага
    traj: [Option<Vec<[f64; 7]>>; 3], // [x, y, z, vx, vy, vz, t] по телам
    time: f64,
    dt: f64,
    frame: u64,
    singular_reported: bool,
}

impl Simulator<Gravity> {
    pub fn new(configs: &[BodyConfig; 3], dt: f64) -> Self {
        Self::with_field(configs, dt, Gravity::default())
    }

    /// Потенциальная энергия для закона притяжения с текущим g.
    pub fn potential_energy(&self) -> f64 {
        potential_energy(&self.bodies, self.field.params.g)
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }
}

impl<F: ForceField> Simulator<F> {
    pub fn with_field(configs: &[BodyConfig; 3], dt: f64, field: F) -> Self {
        let ids = assign_ids(configs);
        let bodies = [
            configs[0].to_body_with_id(ids[0]),
            configs[1].to_body_with_id(ids[1]),
            configs[2].to_body_with_id(ids[2]),
        ];
        Self::from_bodies(bodies, dt, field)
    }

    pub fn from_bodies(bodies: [Body; 3], dt: f64, field: F) -> Self {
        debug!(
            "simulator: dt = {}, masses = [{}, {}, {}]",
            dt,
            bodies[0].mass(),
            bodies[1].mass(),
            bodies[2].mass()
        );
        Self {
            bodies,
            field,
            acc: [Vector3::zeros(); 3],
            traj: [None, None, None],
            time: 0.0,
            dt,
            frame: 0,
            singular_reported: false,
        }
    }

    pub fn time(&self) -> f64 { self.time }
    pub fn dt(&self) -> f64 { self.dt }
    pub fn frame(&self) -> u64 { self.frame }
    pub fn bodies(&self) -> &[Body; 3] { &self.bodies }
    pub fn field(&self) -> &F { &self.field }
    pub fn last_accelerations(&self) -> &[Vector3<f64>; 3] { &self.acc }

    pub fn positions(&self) -> [Vector3<f64>; 3] {
        [
            self.bodies[0].position(),
            self.bodies[1].position(),
            self.bodies[2].position(),
        ]
    }

    /// Включить/выключить запись траекторий. Включение пишет текущее состояние первой строкой.
    pub fn record_trajectories(&mut self, enabled: bool) {
        for (i, slot) in self.traj.iter_mut().enumerate() {
            *slot = if enabled {
                let s = self.bodies[i].state_array();
                Some(vec![[s[0], s[1], s[2], s[3], s[4], s[5], self.time]])
            } else {
                None
            };
        }
    }

    /// Ссылка на траекторию i-го тела, если запись включена
    pub fn trajectory_of(&self, i: usize) -> Option<&[[f64; 7]]> {
        self.traj.get(i).and_then(|t| t.as_deref())
    }

    /// Один кадр: ускорения по текущему состоянию, затем три независимых update.
    pub fn step(&mut self) {
        let acc = self.field.accelerations(&self.bodies);
        self.advance(acc);
    }

    /// Один кадр с внешним полем вместо собственного.
    pub fn step_with_field<G: ForceField>(&mut self, field: &G) {
        let acc = field.accelerations(&self.bodies);
        self.advance(acc);
    }

    /// Параллельный кадр (только если включена фича parallel). Результат совпадает со step().
    #[cfg(feature = "parallel")]
    pub fn step_par(&mut self) {
        use rayon::prelude::*;
        let acc = self.field.accelerations(&self.bodies);
        let dt = self.dt;
        self.bodies[..]
            .par_iter_mut()
            .zip(acc[..].par_iter())
            .for_each(|(body, a)| body.update_with_step(*a, dt));
        self.acc = acc;
        self.finish_step();
    }

    /// Прогнать frames кадров, вернуть модельное время.
    pub fn run(&mut self, frames: usize) -> f64 {
        for _ in 0..frames {
            self.step();
        }
        self.time
    }

    fn advance(&mut self, acc: [Vector3<f64>; 3]) {
        let dt = self.dt;
        for (body, a) in self.bodies.iter_mut().zip(acc.iter()) {
            body.update_with_step(*a, dt);
        }
        self.acc = acc;
        self.finish_step();
    }

    fn finish_step(&mut self) {
        self.time += self.dt;
        self.frame += 1;

        for (body, slot) in self.bodies.iter().zip(self.traj.iter_mut()) {
            if let Some(t) = slot {
                let s = body.state_array();
                t.push([s[0], s[1], s[2], s[3], s[4], s[5], self.time]);
            }
        }

        if !self.singular_reported {
            if let Some(i) = self.first_non_finite() {
                warn!(
                    "body {} has non-finite state at frame {} (t = {:.3}); bodies likely coincided",
                    self.bodies[i].id().0,
                    self.frame,
                    self.time
                );
                self.singular_reported = true;
            }
        }

        trace!("frame {} t = {:.3}", self.frame, self.time);
    }

    /// Индекс первого тела с NaN/Inf в состоянии.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.bodies.iter().position(|b| !b.is_finite())
    }

    /// Суммарный импульс Σ m·v.
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies.iter().map(|b| b.momentum()).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }

    /// Получить матрицу состояний 3x6 (x,y,z,vx,vy,vz)
    pub fn state_matrix(&self) -> Vec<[f64; 6]> {
        self.bodies.iter().map(|b| b.state_array()).collect()
    }

    /// Сформировать удобный снимок по всем телам (для UI/отладочного вывода).
    pub fn body_snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .zip(self.acc.iter())
            .map(|(b, a)| BodySnapshot {
                id: b.id().0,
                mass: b.mass(),
                state: b.state_array(),
                acceleration: [a.x, a.y, a.z],
            })
            .collect()
    }
}
