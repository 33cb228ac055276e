pub mod app;
pub mod graphics;

/// Deterministic game rules: a pure transition from one state to the next.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

/// Drives a `GameLogic` without a window, keeping the input log so a run can be
/// replayed from scratch.
#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    state: G::State,
    inputs: Vec<G::Input>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let state = game.initial_state();
        Self {
            game,
            state,
            inputs: Vec::new(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Number of inputs applied since the last reset.
    pub fn frame(&self) -> usize {
        self.inputs.len()
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn inputs(&self) -> &[G::Input] {
        &self.inputs
    }

    pub fn step(&mut self, input: G::Input) -> usize
    where
        G::Input: Clone,
    {
        self.state = self.game.step(&self.state, input.clone());
        self.inputs.push(input);
        self.frame()
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
        G::Input: Clone,
    {
        for input in inputs {
            self.step(input);
        }
        self.frame()
    }

    pub fn reset(&mut self) {
        self.state = self.game.initial_state();
        self.inputs.clear();
    }

    /// Rebuilds the current state from the initial state and the recorded inputs.
    pub fn replay(&self) -> G::State
    where
        G::Input: Clone,
    {
        self.inputs
            .iter()
            .cloned()
            .fold(self.game.initial_state(), |state, input| {
                self.game.step(&state, input)
            })
    }
}
