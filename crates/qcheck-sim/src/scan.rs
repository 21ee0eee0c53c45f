//! Register scan utilities.
//!
//! Clamp a selection register to each of its `2^k` binary assignments in
//! increasing numeric order, run the circuit on the fast engine, and collect
//! what happened on the observed registers. This is how unary-iteration and
//! oracle circuits are checked branch by branch, and how uncomputation is
//! checked: every ancilla must be back at 0 after the full circuit.
//!
//! The scan only collects traces. Deciding whether a trace is correct is up
//! to the caller, with one exception: a dirty ancilla aborts the scan unless
//! [`RegisterScan::fail_on_dirty_ancilla`] is turned off.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use qcheck_ir::{Circuit, GateRecord, QubitId, QubitRegister};

use crate::config::ScanConfig;
use crate::error::{SimError, SimResult};
use crate::pauli::{PauliSimulator, PauliState};

/// Widest selection register the scan will enumerate.
pub const MAX_SELECTION_WIDTH: usize = 24;

/// What to record on a register while the circuit runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// For every gate whose targets intersect the register, whether the
    /// gate's controls fired.
    TargetFiring(QubitRegister),
    /// For every firing gate with a control in the register, the register's
    /// values at that moment.
    ControlSamples(QubitRegister),
    /// The register's values after the full run.
    FinalValues(QubitRegister),
}

/// One recorded observation during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A gate touching an observed target register was reached.
    TargetFiring {
        /// Gate index in the circuit.
        gate: usize,
        /// Observed register name.
        register: String,
        /// Whether the controls matched.
        fired: bool,
    },
    /// A firing gate was controlled by an observed register.
    ControlSample {
        /// Gate index in the circuit.
        gate: usize,
        /// Observed register name.
        register: String,
        /// Register values when the gate fired.
        values: Vec<u8>,
    },
}

/// Everything observed for one selection assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Selection bitstring; character j is the value of selection qubit j.
    pub assignment: String,
    /// Events in gate order.
    pub events: Vec<TraceEvent>,
    /// Final values of each `FinalValues` register, by register name.
    pub final_values: BTreeMap<String, Vec<u8>>,
    /// Whether every ancilla qubit ended at 0.
    pub ancilla_clean: bool,
    /// Ancilla qubits left at 1.
    pub dirty_ancilla: Vec<QubitId>,
    /// Full state after the run.
    pub final_state: PauliState,
}

impl Trace {
    /// Gate indices at which `register`'s target gates fired.
    pub fn fired_gates(&self, register: &str) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::TargetFiring {
                    gate,
                    register: r,
                    fired: true,
                } if r == register => Some(*gate),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection={}", self.assignment)?;
        if self.ancilla_clean {
            writeln!(f, " ancilla=clean")?;
        } else {
            writeln!(f, " ancilla=dirty {:?}", self.dirty_ancilla)?;
        }
        for event in &self.events {
            match event {
                TraceEvent::TargetFiring {
                    gate,
                    register,
                    fired,
                } => {
                    let status = if *fired { "fired" } else { "skipped" };
                    writeln!(f, "  gate {gate:>4} {register}: {status}")?;
                }
                TraceEvent::ControlSample {
                    gate,
                    register,
                    values,
                } => writeln!(f, "  gate {gate:>4} {register}: {}", bits(values))?,
            }
        }
        for (register, values) in &self.final_values {
            writeln!(f, "  final {register}: {}", bits(values))?;
        }
        Ok(())
    }
}

fn bits(values: &[u8]) -> String {
    values.iter().map(|v| char::from(b'0' + v)).collect()
}

/// Traces for every selection assignment, in increasing numeric order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Circuit name.
    pub circuit: String,
    /// Selection register name.
    pub selection: String,
    /// Traces keyed by selection bitstring.
    pub traces: BTreeMap<String, Trace>,
}

impl ScanReport {
    /// Trace for one assignment.
    pub fn get(&self, assignment: &str) -> Option<&Trace> {
        self.traces.get(assignment)
    }

    /// Iterate over `(assignment, trace)` in increasing numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Trace)> {
        self.traces.iter()
    }

    /// Number of assignments scanned.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether no assignment was scanned.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Whether every assignment left the ancilla register clean.
    pub fn all_ancilla_clean(&self) -> bool {
        self.traces.values().all(|t| t.ancilla_clean)
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scan of '{}' over {}", self.circuit, self.selection)?;
        for trace in self.traces.values() {
            write!(f, "{trace}")?;
        }
        Ok(())
    }
}

/// Enumerates a selection register and collects per-assignment traces.
#[derive(Debug, Clone)]
pub struct RegisterScan {
    selection: QubitRegister,
    ancilla: Option<QubitRegister>,
    target: Option<QubitRegister>,
    observations: Vec<Observation>,
    initial: Option<PauliState>,
    fail_on_dirty_ancilla: bool,
    log_traces: bool,
}

impl RegisterScan {
    /// Scan over `selection`, with default settings.
    pub fn new(selection: QubitRegister) -> Self {
        Self::from_config(selection, &ScanConfig::default())
    }

    /// Scan over `selection`, with settings from configuration.
    pub fn from_config(selection: QubitRegister, config: &ScanConfig) -> Self {
        Self {
            selection,
            ancilla: None,
            target: None,
            observations: vec![],
            initial: None,
            fail_on_dirty_ancilla: config.fail_on_dirty_ancilla,
            log_traces: config.log_traces,
        }
    }

    /// Ancilla register: zeroed before and checked after every run.
    #[must_use]
    pub fn with_ancilla(mut self, ancilla: QubitRegister) -> Self {
        self.ancilla = Some(ancilla);
        self
    }

    /// Target register: zeroed before every run.
    #[must_use]
    pub fn with_target(mut self, target: QubitRegister) -> Self {
        self.target = Some(target);
        self
    }

    /// Add an observation.
    #[must_use]
    pub fn observe(mut self, observation: Observation) -> Self {
        self.observations.push(observation);
        self
    }

    /// State every run starts from before registers are clamped.
    #[must_use]
    pub fn with_initial_state(mut self, state: PauliState) -> Self {
        self.initial = Some(state);
        self
    }

    /// Whether a dirty ancilla aborts the scan (default) or is only recorded.
    #[must_use]
    pub fn fail_on_dirty_ancilla(mut self, fail: bool) -> Self {
        self.fail_on_dirty_ancilla = fail;
        self
    }

    /// Emit every trace through `tracing` at info level.
    #[must_use]
    pub fn log_traces(mut self, log: bool) -> Self {
        self.log_traces = log;
        self
    }

    /// Run the circuit once per selection assignment.
    pub fn run(&self, circuit: &Circuit) -> SimResult<ScanReport> {
        let width = self.selection.len();
        if width == 0 {
            return Err(SimError::EmptySelection(self.selection.name.clone()));
        }
        if width > MAX_SELECTION_WIDTH {
            return Err(SimError::SelectionTooWide {
                name: self.selection.name.clone(),
                width,
                max: MAX_SELECTION_WIDTH,
            });
        }

        self.check_disjoint()?;

        let base = self
            .initial
            .clone()
            .unwrap_or_else(|| PauliState::new(circuit.num_qubits() as usize));
        let mut sim = PauliSimulator::with_state(circuit, base.clone())?;

        debug!(
            circuit = circuit.name(),
            selection = %self.selection,
            assignments = 1usize << width,
            "starting register scan"
        );

        let mut traces = BTreeMap::new();
        for assignment in 0..(1usize << width) {
            let bitstring = format!("{assignment:0width$b}");
            let trace = self.run_assignment(&mut sim, &base, bitstring)?;
            if self.log_traces {
                info!(circuit = circuit.name(), "{trace}");
            }
            traces.insert(trace.assignment.clone(), trace);
        }

        Ok(ScanReport {
            circuit: circuit.name().to_string(),
            selection: self.selection.name.clone(),
            traces,
        })
    }

    /// Selection, ancilla and target registers must not share qubits.
    fn check_disjoint(&self) -> SimResult<()> {
        let registers: Vec<&QubitRegister> = std::iter::once(&self.selection)
            .chain(self.ancilla.iter())
            .chain(self.target.iter())
            .collect();
        for (i, first) in registers.iter().enumerate() {
            for second in &registers[i + 1..] {
                if let Some(&qubit) = first.qubits.iter().find(|&&q| second.contains(q)) {
                    return Err(SimError::RegisterOverlap {
                        first: first.name.clone(),
                        second: second.name.clone(),
                        qubit,
                    });
                }
            }
        }
        Ok(())
    }

    fn run_assignment(
        &self,
        sim: &mut PauliSimulator<'_>,
        base: &PauliState,
        assignment: String,
    ) -> SimResult<Trace> {
        let mut state = base.clone();
        let values: Vec<u8> = assignment.bytes().map(|b| b - b'0').collect();
        state.set_value(&self.selection.qubits, &values)?;
        for register in [&self.ancilla, &self.target].into_iter().flatten() {
            state.set_value(&register.qubits, &vec![0; register.len()])?;
        }
        sim.set_state(state)?;

        let circuit = sim.circuit();
        let mut events = vec![];
        for (index, record) in circuit.gates().iter().enumerate() {
            self.observe_gate(sim.state(), index, record, &mut events);
            sim.step(index)?;
        }

        let state = sim.state();
        let mut final_values = BTreeMap::new();
        for observation in &self.observations {
            if let Observation::FinalValues(register) = observation {
                final_values.insert(register.name.clone(), register_values(state, register));
            }
        }

        let dirty_ancilla: Vec<QubitId> = self
            .ancilla
            .iter()
            .flat_map(|r| r.qubits.iter().copied())
            .filter(|&q| state.value(q) != Some(0))
            .collect();

        if !dirty_ancilla.is_empty() {
            warn!(
                assignment = %assignment,
                qubits = ?dirty_ancilla,
                "ancilla register not reset"
            );
            if self.fail_on_dirty_ancilla {
                return Err(SimError::AncillaNotReset {
                    assignment,
                    qubits: dirty_ancilla,
                });
            }
        }

        Ok(Trace {
            assignment,
            events,
            final_values,
            ancilla_clean: dirty_ancilla.is_empty(),
            dirty_ancilla,
            final_state: state.clone(),
        })
    }

    /// Record observations for the gate about to run at `index`.
    fn observe_gate(
        &self,
        state: &PauliState,
        index: usize,
        record: &GateRecord,
        events: &mut Vec<TraceEvent>,
    ) {
        let fired = state.controls_match(record);
        for observation in &self.observations {
            match observation {
                Observation::TargetFiring(register)
                    if record.targets.iter().any(|&q| register.contains(q)) =>
                {
                    events.push(TraceEvent::TargetFiring {
                        gate: index,
                        register: register.name.clone(),
                        fired,
                    });
                }
                Observation::ControlSamples(register)
                    if fired && record.controls.iter().any(|&q| register.contains(q)) =>
                {
                    events.push(TraceEvent::ControlSample {
                        gate: index,
                        register: register.name.clone(),
                        values: register_values(state, register),
                    });
                }
                _ => {}
            }
        }
    }
}

fn register_values(state: &PauliState, register: &QubitRegister) -> Vec<u8> {
    register
        .qubits
        .iter()
        .map(|&q| state.value(q).unwrap_or(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments_in_numeric_order() {
        let circuit = Circuit::new(3).unwrap();
        let report = RegisterScan::new(QubitRegister::range("sel", 0, 3))
            .run(&circuit)
            .unwrap();
        let keys: Vec<&str> = report.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["000", "001", "010", "011", "100", "101", "110", "111"]
        );
        // Character j is the value of selection qubit j.
        assert_eq!(report.get("100").unwrap().final_state.values(), &[1, 0, 0]);
        assert_eq!(report.get("001").unwrap().final_state.values(), &[0, 0, 1]);
    }

    #[test]
    fn test_empty_selection() {
        let circuit = Circuit::new(1).unwrap();
        let err = RegisterScan::new(QubitRegister::new("sel", []))
            .run(&circuit)
            .unwrap_err();
        assert!(matches!(err, SimError::EmptySelection(_)));
    }

    #[test]
    fn test_selection_out_of_range() {
        let circuit = Circuit::new(2).unwrap();
        let err = RegisterScan::new(QubitRegister::range("sel", 1, 2))
            .run(&circuit)
            .unwrap_err();
        assert!(matches!(err, SimError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_target_and_ancilla_cleared_over_initial_state() {
        let circuit = Circuit::new(3).unwrap();
        let mut initial = PauliState::new(3);
        initial
            .set_value(&[QubitId(1), QubitId(2)], &[1, 1])
            .unwrap();
        let report = RegisterScan::new(QubitRegister::range("sel", 0, 1))
            .with_target(QubitRegister::range("tgt", 1, 1))
            .with_initial_state(initial)
            .fail_on_dirty_ancilla(false)
            .run(&circuit)
            .unwrap();
        // Target zeroed, untouched qubit 2 keeps its initial value.
        assert_eq!(report.get("0").unwrap().final_state.values(), &[0, 0, 1]);
    }

    #[test]
    fn test_bits_helper() {
        assert_eq!(bits(&[1, 0, 1]), "101");
    }
}
