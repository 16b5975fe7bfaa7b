//! 配置校验模块
//!
//! 校验规则：
//! - sink 名称非空
//! - sink 类型必填参数齐全且非空
//! - network sink 的 addr 可解析

use std::net::SocketAddr;

use contracts::{ContractError, PipelineBlueprint, SinkType};

/// 校验 PipelineBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    validate_sink(blueprint)?;
    Ok(())
}

/// 校验 sink 配置
fn validate_sink(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let sink = &blueprint.sink;
    if sink.name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "sink.name",
            "sink name cannot be empty",
        ));
    }

    for param in sink.sink_type.required_params() {
        let present = sink
            .params
            .get(*param)
            .is_some_and(|v| !v.trim().is_empty());
        if !present {
            return Err(ContractError::config_validation(
                format!("sink.params.{param}"),
                format!("missing required parameter for {:?} sink", sink.sink_type),
            ));
        }
    }

    if sink.sink_type == SinkType::Network {
        if let Some(addr) = sink.params.get("addr") {
            addr.parse::<SocketAddr>().map_err(|e| {
                ContractError::config_validation(
                    "sink.params.addr",
                    format!("invalid address '{addr}': {e}"),
                )
            })?;
        }
    }

    Ok(())
}
