//! gRPC server implementation for MatchEngineService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::engine::board;
use crate::engine::checkout;
use crate::engine::dart;
use crate::engine::error::EngineError;
use crate::engine::match_state;
use crate::engine::stats;
use crate::engine::visit;
use crate::store::MatchStore;

pub mod proto {
    tonic::include_proto!("logan.match_engine.v1");
}

use proto::match_engine_service_server::MatchEngineService;
use proto::*;

/// The gRPC service implementation.
pub struct MatchEngineServer {
    store: Arc<MatchStore>,
}

impl MatchEngineServer {
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self { store }
    }
}

// --- Conversion helpers: engine types -> protobuf ---

fn dart_to_proto(d: &dart::Dart) -> Dart {
    Dart {
        value: u32::from(d.value),
        multiplier: u32::from(d.multiplier),
        score: u32::from(d.score()),
        is_double: d.is_double(),
        notation: d.to_string(),
    }
}

fn outcome_to_str(outcome: visit::VisitOutcome) -> &'static str {
    match outcome {
        visit::VisitOutcome::Normal => "normal",
        visit::VisitOutcome::Bust => "bust",
        visit::VisitOutcome::Checkout => "checkout",
    }
}

fn visit_to_proto(v: &visit::Visit) -> Visit {
    Visit {
        player_id: u32::from(v.player.number()),
        darts: v.darts.iter().map(dart_to_proto).collect(),
        remaining_before: u32::from(v.remaining_before),
        remaining_after: u32::from(v.remaining_after),
        outcome: outcome_to_str(v.outcome).to_string(),
    }
}

fn state_to_snapshot(state: &match_state::MatchState) -> MatchSnapshot {
    let set = state.current_set();
    let leg = state.current_leg();
    let players = match_state::PlayerId::BOTH
        .iter()
        .map(|&p| PlayerSnapshot {
            player_id: u32::from(p.number()),
            remaining: u32::from(leg.remaining_for(p)),
            legs_won: u32::from(set.legs_won(p)),
            sets_won: u32::from(state.sets_won(p)),
        })
        .collect();

    MatchSnapshot {
        players,
        active_player_id: state
            .active_player()
            .map(|p| u32::from(p.number()))
            .unwrap_or(0),
        winner_player_id: state.winner.map(|p| u32::from(p.number())).unwrap_or(0),
        current_leg_visits: leg.visits.iter().map(visit_to_proto).collect(),
        last_visit: state.last_visit().map(visit_to_proto),
        match_json: serde_json::to_vec(state).unwrap_or_default(),
    }
}

fn suggestion_to_proto(s: &checkout::CheckoutSuggestion) -> CheckoutSuggestion {
    CheckoutSuggestion {
        darts: s.darts.iter().map(dart_to_proto).collect(),
        notations: s.notations(),
    }
}

fn player_stats_to_proto(s: &stats::PlayerStats) -> PlayerStats {
    PlayerStats {
        player_id: u32::from(s.player.number()),
        visits: s.visits,
        darts_thrown: s.darts_thrown,
        points_scored: s.points_scored,
        three_dart_average: s.three_dart_average,
        count_100_plus: s.count_100_plus,
        count_140_plus: s.count_140_plus,
        count_180: s.count_180,
        highest_visit: u32::from(s.highest_visit),
        busts: s.busts,
        checkouts: s.checkouts,
        checkout_attempts: s.checkout_attempts,
        checkout_percentage: s.checkout_percentage,
    }
}

fn ring_to_str(ring: board::Ring) -> &'static str {
    match ring {
        board::Ring::Miss => "miss",
        board::Ring::Single => "single",
        board::Ring::Double => "double",
        board::Ring::Triple => "triple",
        board::Ring::Bull => "bull",
        board::Ring::Dbull => "dbull",
    }
}

fn scored_pixel_to_proto(d: &board::ScoredPixel) -> ScoredPixel {
    ScoredPixel {
        x: d.x,
        y: d.y,
        value: u32::from(d.value),
        multiplier: u32::from(d.multiplier),
        score: u32::from(d.score),
        ring: ring_to_str(d.ring).to_string(),
        sector: d.sector.map(u32::from).unwrap_or(0),
        angle_deg: d.angle_deg,
        radius_ratio: d.radius_ratio,
        confidence: d.confidence,
    }
}

fn calibration_to_proto(board_id: &str, calib: &board::BoardCalibration) -> CalibrationResponse {
    CalibrationResponse {
        board_id: board_id.to_string(),
        center_x: calib.center_x,
        center_y: calib.center_y,
        radius_px: calib.radius_px,
        rotation_deg: calib.rotation_deg,
    }
}

fn engine_error_to_status(err: EngineError) -> Status {
    match &err {
        EngineError::InvalidDart(_)
        | EngineError::InvalidVisitLength(_)
        | EngineError::InvalidRemaining(_)
        | EngineError::InvalidCalibration(_) => Status::invalid_argument(err.to_string()),
        EngineError::MatchAlreadyWon | EngineError::NothingToUndo => {
            Status::failed_precondition(err.to_string())
        }
    }
}

#[tonic::async_trait]
impl MatchEngineService for MatchEngineServer {
    async fn get_state(
        &self,
        _request: Request<GetStateRequest>,
    ) -> Result<Response<MatchSnapshot>, Status> {
        Ok(Response::new(state_to_snapshot(&self.store.snapshot())))
    }

    async fn submit_visit(
        &self,
        request: Request<SubmitVisitRequest>,
    ) -> Result<Response<MatchSnapshot>, Status> {
        let req = request.into_inner();
        let darts: Vec<dart::Dart> = req
            .darts
            .iter()
            .map(|n| dart::Dart::parse(n))
            .collect::<Result<_, _>>()
            .map_err(engine_error_to_status)?;
        let state = self
            .store
            .submit_visit(&darts)
            .map_err(engine_error_to_status)?;
        tracing::debug!(darts = ?req.darts, "visit applied");
        Ok(Response::new(state_to_snapshot(&state)))
    }

    async fn undo_visit(
        &self,
        _request: Request<UndoVisitRequest>,
    ) -> Result<Response<MatchSnapshot>, Status> {
        let state = self.store.undo().map_err(engine_error_to_status)?;
        tracing::debug!("visit undone");
        Ok(Response::new(state_to_snapshot(&state)))
    }

    async fn reset_match(
        &self,
        _request: Request<ResetMatchRequest>,
    ) -> Result<Response<MatchSnapshot>, Status> {
        let state = self.store.reset();
        tracing::info!("match reset");
        Ok(Response::new(state_to_snapshot(&state)))
    }

    async fn get_checkout(
        &self,
        request: Request<GetCheckoutRequest>,
    ) -> Result<Response<GetCheckoutResponse>, Status> {
        let req = request.into_inner();
        if req.remaining < 0 || req.remaining > 501 {
            return Err(engine_error_to_status(EngineError::InvalidRemaining(
                i64::from(req.remaining),
            )));
        }
        let limit = if req.limit == 0 {
            checkout::DEFAULT_SUGGESTION_LIMIT
        } else {
            req.limit as usize
        };
        let double_out = self.store.config().double_out;
        let suggestions = checkout::suggest_checkouts(req.remaining as u16, double_out, limit)
            .iter()
            .map(suggestion_to_proto)
            .collect();
        Ok(Response::new(GetCheckoutResponse { suggestions }))
    }

    async fn get_stats(
        &self,
        _request: Request<GetStatsRequest>,
    ) -> Result<Response<GetStatsResponse>, Status> {
        let state = self.store.snapshot();
        let stats = stats::compute_match_stats(&state);
        Ok(Response::new(GetStatsResponse {
            players: stats.players.iter().map(player_stats_to_proto).collect(),
        }))
    }

    async fn get_calibration(
        &self,
        request: Request<GetCalibrationRequest>,
    ) -> Result<Response<CalibrationResponse>, Status> {
        let req = request.into_inner();
        let calib = self.store.calibration(&req.board_id).ok_or_else(|| {
            Status::not_found(format!("no calibration for board {:?}", req.board_id))
        })?;
        Ok(Response::new(calibration_to_proto(&req.board_id, &calib)))
    }

    async fn set_calibration(
        &self,
        request: Request<SetCalibrationRequest>,
    ) -> Result<Response<CalibrationResponse>, Status> {
        let req = request.into_inner();
        let calib = board::BoardCalibration::new(
            req.center_x,
            req.center_y,
            req.radius_px,
            req.rotation_deg,
        )
        .map_err(engine_error_to_status)?;
        self.store.set_calibration(&req.board_id, calib.clone());
        tracing::info!(board = %req.board_id, "calibration updated");
        Ok(Response::new(calibration_to_proto(&req.board_id, &calib)))
    }

    async fn score_board(
        &self,
        request: Request<ScoreBoardRequest>,
    ) -> Result<Response<ScoreBoardResponse>, Status> {
        let req = request.into_inner();
        let calib = self
            .store
            .calibration(&req.board_id)
            .ok_or_else(|| Status::failed_precondition("set calibration first"))?;
        let hits: Vec<(f64, f64, f64)> =
            req.darts.iter().map(|d| (d.x, d.y, d.confidence)).collect();
        let (scored, total) = board::score_pixels(&hits, &calib);
        Ok(Response::new(ScoreBoardResponse {
            board_id: req.board_id,
            total: u32::from(total),
            darts: scored.iter().map(scored_pixel_to_proto).collect(),
        }))
    }
}
